//! `schema-visit` — schema-driven visitor dispatch core.
//!
//! # Overview
//!
//! Typed data (structs, lists, enums, optional fields, primitives) is walked
//! through a single abstract protocol in one of three modes: decoding from an
//! external representation, encoding to one, or releasing owned storage.
//! Per-type traversal code issues the same fixed call sequence whatever the
//! mode; a [`Visitor`] validates each call, applies numeric narrowing and
//! enum marshaling, and forwards to the mode-specific [`Backend`].
//!
//! Concrete backends live elsewhere (the `schema-visit-json` crate carries
//! JSON-backed decode and encode); this crate only ships the dispatch layer
//! and the representation-independent [`ReleaseBackend`].
//!
//! # Example
//!
//! ```
//! use schema_visit::{ReleaseBackend, Visitor};
//!
//! let mut v = Visitor::new(ReleaseBackend);
//! let mut nickname = Some(String::from("ferris"));
//! v.start_struct::<()>(Some("profile"), None).unwrap();
//! v.type_str(Some("nickname"), &mut nickname).unwrap();
//! v.end_struct().unwrap();
//!
//! // The release traversal took the heap value out of the slot.
//! assert!(nickname.is_none());
//! ```

pub mod backend;
pub mod error;
pub mod list;
pub mod release;
pub mod visitor;

pub use backend::{Backend, ValueKind, VisitMode};
pub use error::{name_or_null, ErrorClass, VisitError};
pub use list::{GenericLink, ListNode};
pub use release::ReleaseBackend;
pub use visitor::Visitor;
