//! Unified dispatch layer for schema-driven traversals.
//!
//! Generated per-type traversal code issues a fixed call sequence mirroring
//! the schema shape (`start_struct` → per-field calls → `end_struct`)
//! against a [`Visitor`]. Each entry point validates its arguments, applies
//! numeric narrowing or enum marshaling where relevant, forwards to the
//! active [`Backend`], and reports the outcome as a single `Result`. The
//! traversal code never learns which mode it is running under.

use std::mem;

use serde_json::Value;

use crate::backend::{Backend, ValueKind, VisitMode};
use crate::error::{name_or_null, VisitError};
use crate::list::{GenericLink, ListNode};

/// Dispatch handle for one traversal.
///
/// A `Visitor` owns exactly one backend and holds no traversal state of its
/// own; position, nesting, and buffering all live behind the [`Backend`].
/// After any call reports an error the traversal must stop; the behavior of
/// further calls on the same visitor is unspecified at this layer.
pub struct Visitor<B: Backend> {
    backend: B,
}

impl<B: Backend> Visitor<B> {
    pub fn new(backend: B) -> Self {
        Visitor { backend }
    }

    /// The mode of the underlying backend.
    pub fn mode(&self) -> VisitMode {
        self.backend.mode()
    }

    /// Consume the visitor and hand the backend back, e.g. to extract an
    /// encode backend's finished output.
    pub fn into_inner(self) -> B {
        self.backend
    }

    // ── Structs ───────────────────────────────────────────────────────────

    /// Begin a named aggregate.
    ///
    /// Under [`VisitMode::Decode`], a supplied storage slot is filled with
    /// `T::default()` on success and left empty on failure: exactly one of
    /// the two, never both.
    pub fn start_struct<T: Default>(
        &mut self,
        name: Option<&str>,
        obj: Option<&mut Option<T>>,
    ) -> Result<(), VisitError> {
        let res = self.backend.start_struct(name);
        if let Some(slot) = obj {
            if self.backend.mode() == VisitMode::Decode {
                if res.is_ok() {
                    *slot = Some(T::default());
                }
                debug_assert!(res.is_ok() == slot.is_some());
            }
        }
        res
    }

    pub fn end_struct(&mut self) -> Result<(), VisitError> {
        self.backend.end_struct()
    }

    /// Begin a struct flattened into its parent without a named field of its
    /// own. On a backend without the capability this is a no-op that
    /// succeeds, and a supplied storage slot stays untouched.
    pub fn start_implicit_struct<T: Default>(
        &mut self,
        obj: Option<&mut Option<T>>,
    ) -> Result<(), VisitError> {
        let res = self.backend.start_implicit_struct();
        if let Some(slot) = obj {
            if self.backend.mode() == VisitMode::Decode
                && self.backend.supports_implicit_struct()
                && res.is_ok()
            {
                *slot = Some(T::default());
            }
        }
        res
    }

    pub fn end_implicit_struct(&mut self) {
        self.backend.end_implicit_struct();
    }

    // ── Lists ─────────────────────────────────────────────────────────────

    pub fn start_list(&mut self, name: Option<&str>) -> Result<(), VisitError> {
        self.backend.start_list(name)
    }

    /// Pull the next link of a sequence.
    ///
    /// `size` is the caller's node size and must be at least the size of the
    /// minimal link shape ([`GenericLink`]). A smaller value means the
    /// calling code and the protocol disagree about the node layout, which
    /// is a programming error rather than bad input, and aborts
    /// unconditionally.
    ///
    /// Under [`VisitMode::Decode`] the backend decides from its input
    /// whether another element follows, and a fresh `N::default()` is linked
    /// into `link`; the node payload is never touched here. Under the other
    /// modes the caller's chain drives the iteration: pass the head slot
    /// first, then each returned node's [`ListNode::next_mut`] slot.
    pub fn next_list<'a, N: ListNode>(
        &mut self,
        link: &'a mut Option<Box<N>>,
        size: usize,
    ) -> Option<&'a mut N> {
        assert!(
            size >= mem::size_of::<GenericLink>(),
            "list node size {size} is smaller than the minimal link shape",
        );
        if !self.backend.next_list(link.is_some()) {
            return None;
        }
        if self.backend.mode() == VisitMode::Decode {
            *link = Some(Box::new(N::default()));
        }
        link.as_deref_mut()
    }

    pub fn end_list(&mut self) {
        self.backend.end_list();
    }

    // ── Optional fields and dynamic types ─────────────────────────────────

    /// Report whether the field `name` is present.
    ///
    /// `present` must be `true` on entry; a backend without the capability
    /// leaves it untouched, so every field reads as present.
    pub fn optional(&mut self, name: Option<&str>, present: &mut bool) -> bool {
        self.backend.optional(name, present);
        *present
    }

    /// Peek the dynamic type of the upcoming value without consuming it.
    /// A backend without the capability leaves `kind` unset.
    pub fn get_next_type(
        &mut self,
        name: Option<&str>,
        kind: &mut Option<ValueKind>,
    ) -> Result<(), VisitError> {
        self.backend.get_next_type(name, kind)
    }

    // ── Scalars ───────────────────────────────────────────────────────────

    pub fn type_bool(&mut self, name: Option<&str>, obj: &mut bool) -> Result<(), VisitError> {
        self.backend.type_bool(name, obj)
    }

    pub fn type_number(&mut self, name: Option<&str>, obj: &mut f64) -> Result<(), VisitError> {
        self.backend.type_number(name, obj)
    }

    /// Visit a string value. Under [`VisitMode::Decode`] the backend must
    /// fill `obj` exactly when it succeeds; test builds check the invariant.
    pub fn type_str(
        &mut self,
        name: Option<&str>,
        obj: &mut Option<String>,
    ) -> Result<(), VisitError> {
        let res = self.backend.type_str(name, obj);
        if self.backend.mode() == VisitMode::Decode {
            debug_assert!(res.is_ok() == obj.is_some());
        }
        res
    }

    /// Visit a dynamic value. Same decode contract as [`Visitor::type_str`].
    pub fn type_any(
        &mut self,
        name: Option<&str>,
        obj: &mut Option<Value>,
    ) -> Result<(), VisitError> {
        let res = self.backend.type_any(name, obj);
        if self.backend.mode() == VisitMode::Decode {
            debug_assert!(res.is_ok() == obj.is_some());
        }
        res
    }

    pub fn type_i64(&mut self, name: Option<&str>, obj: &mut i64) -> Result<(), VisitError> {
        self.backend.type_i64(name, obj)
    }

    pub fn type_u64(&mut self, name: Option<&str>, obj: &mut u64) -> Result<(), VisitError> {
        self.backend.type_u64(name, obj)
    }

    /// Visit a size value. Size-aware backends may interpret shorthand
    /// magnitude notation; all others take the plain `u64` path.
    pub fn type_size(&mut self, name: Option<&str>, obj: &mut u64) -> Result<(), VisitError> {
        self.backend.type_size(name, obj)
    }

    // ── Numeric narrowing ─────────────────────────────────────────────────
    // Every fixed width funnels through the two 64-bit backend primitives;
    // a backend never sees a narrow integer.

    fn type_uint_n(
        &mut self,
        name: Option<&str>,
        obj: &mut u64,
        max: u64,
        token: &str,
    ) -> Result<(), VisitError> {
        let mut value = *obj;
        self.backend.type_u64(name, &mut value)?;
        if value > max {
            return Err(VisitError::invalid_parameter_value(name_or_null(name), token));
        }
        *obj = value;
        Ok(())
    }

    fn type_int_n(
        &mut self,
        name: Option<&str>,
        obj: &mut i64,
        min: i64,
        max: i64,
        token: &str,
    ) -> Result<(), VisitError> {
        let mut value = *obj;
        self.backend.type_i64(name, &mut value)?;
        if value < min || value > max {
            return Err(VisitError::invalid_parameter_value(name_or_null(name), token));
        }
        *obj = value;
        Ok(())
    }

    pub fn type_u8(&mut self, name: Option<&str>, obj: &mut u8) -> Result<(), VisitError> {
        let mut value = u64::from(*obj);
        self.type_uint_n(name, &mut value, u64::from(u8::MAX), "uint8_t")?;
        *obj = value as u8;
        Ok(())
    }

    pub fn type_u16(&mut self, name: Option<&str>, obj: &mut u16) -> Result<(), VisitError> {
        let mut value = u64::from(*obj);
        self.type_uint_n(name, &mut value, u64::from(u16::MAX), "uint16_t")?;
        *obj = value as u16;
        Ok(())
    }

    pub fn type_u32(&mut self, name: Option<&str>, obj: &mut u32) -> Result<(), VisitError> {
        let mut value = u64::from(*obj);
        self.type_uint_n(name, &mut value, u64::from(u32::MAX), "uint32_t")?;
        *obj = value as u32;
        Ok(())
    }

    pub fn type_i8(&mut self, name: Option<&str>, obj: &mut i8) -> Result<(), VisitError> {
        let mut value = i64::from(*obj);
        self.type_int_n(
            name,
            &mut value,
            i64::from(i8::MIN),
            i64::from(i8::MAX),
            "int8_t",
        )?;
        *obj = value as i8;
        Ok(())
    }

    pub fn type_i16(&mut self, name: Option<&str>, obj: &mut i16) -> Result<(), VisitError> {
        let mut value = i64::from(*obj);
        self.type_int_n(
            name,
            &mut value,
            i64::from(i16::MIN),
            i64::from(i16::MAX),
            "int16_t",
        )?;
        *obj = value as i16;
        Ok(())
    }

    pub fn type_i32(&mut self, name: Option<&str>, obj: &mut i32) -> Result<(), VisitError> {
        let mut value = i64::from(*obj);
        self.type_int_n(
            name,
            &mut value,
            i64::from(i32::MIN),
            i64::from(i32::MAX),
            "int32_t",
        )?;
        *obj = value as i32;
        Ok(())
    }

    // ── Enums ─────────────────────────────────────────────────────────────

    /// Visit an enum field represented in schema code as an index into
    /// `names` and at the backend boundary as the name itself.
    ///
    /// `names` is the schema-owned ordered name table; index `i` is valid
    /// iff `i < names.len()`.
    pub fn type_enum(
        &mut self,
        name: Option<&str>,
        obj: &mut usize,
        names: &[&str],
    ) -> Result<(), VisitError> {
        match self.backend.mode() {
            VisitMode::Decode => self.input_type_enum(name, obj, names),
            VisitMode::Encode => self.output_type_enum(name, obj, names),
            VisitMode::Release => Ok(()),
        }
    }

    fn output_type_enum(
        &mut self,
        name: Option<&str>,
        obj: &mut usize,
        names: &[&str],
    ) -> Result<(), VisitError> {
        let value = *obj;
        if value >= names.len() {
            return Err(VisitError::invalid_parameter(name_or_null(name)));
        }
        let mut repr = Some(names[value].to_string());
        self.type_str(name, &mut repr)
    }

    fn input_type_enum(
        &mut self,
        name: Option<&str>,
        obj: &mut usize,
        names: &[&str],
    ) -> Result<(), VisitError> {
        let mut repr: Option<String> = None;
        self.type_str(name, &mut repr)?;
        // Exactly-one-of guarantees a string on success; a backend breaking
        // that here is unusable, so abort rather than guess.
        let repr = repr.expect("decode backend succeeded without producing a string");
        match names.iter().position(|candidate| *candidate == repr) {
            Some(index) => {
                *obj = index;
                Ok(())
            }
            None => Err(VisitError::invalid_parameter(repr)),
        }
    }
}
