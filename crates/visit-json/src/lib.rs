//! JSON backends for the `schema-visit` dispatch core.
//!
//! # Overview
//!
//! Two backends over `serde_json::Value`: [`JsonDecodeBackend`] walks a
//! borrowed input value, [`JsonEncodeBackend`] builds an output value. The
//! same schema-driven traversal code drives both (and the release mode)
//! without knowing which is active.
//!
//! # Example
//!
//! ```
//! use schema_visit::Visitor;
//! use schema_visit_json::{JsonDecodeBackend, JsonEncodeBackend};
//! use serde_json::json;
//!
//! // Encode: walk a value into JSON.
//! let mut v = Visitor::new(JsonEncodeBackend::new());
//! let mut retries: u8 = 3;
//! v.start_struct::<()>(None, None).unwrap();
//! v.type_u8(Some("retries"), &mut retries).unwrap();
//! v.end_struct().unwrap();
//! assert_eq!(v.into_inner().into_value(), json!({"retries": 3}));
//!
//! // Decode: walk the JSON back out.
//! let input = json!({"retries": 12});
//! let mut v = Visitor::new(JsonDecodeBackend::new(&input));
//! let mut cfg: Option<()> = None;
//! let mut retries: u8 = 0;
//! v.start_struct(None, Some(&mut cfg)).unwrap();
//! v.type_u8(Some("retries"), &mut retries).unwrap();
//! v.end_struct().unwrap();
//! assert_eq!(retries, 12);
//! ```

pub mod decode;
pub mod encode;

pub use decode::JsonDecodeBackend;
pub use encode::JsonEncodeBackend;
