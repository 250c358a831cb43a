//! Decode backend over a borrowed JSON value.
//!
//! The traversal walks the input in place: aggregates push an entry onto a
//! container stack, list elements are pulled by a cursor, and field lookups
//! resolve against the object on top. Nothing is copied except the leaf
//! values handed to the caller.
//!
//! In strict mode the backend additionally tracks which object members a
//! traversal consumed and reports the first leftover at `end_struct`, so
//! schema-driven callers notice input their schema does not know about.

use std::collections::HashSet;

use serde_json::Value;

use schema_visit::{name_or_null, Backend, ValueKind, VisitError, VisitMode};

struct StackEntry<'a> {
    value: &'a Value,
    /// Current list element, `None` before the first `next_list`.
    cursor: Option<usize>,
    /// Object members consumed so far; only filled in strict mode.
    visited: HashSet<String>,
}

impl<'a> StackEntry<'a> {
    fn new(value: &'a Value) -> Self {
        StackEntry {
            value,
            cursor: None,
            visited: HashSet::new(),
        }
    }
}

pub struct JsonDecodeBackend<'a> {
    root: &'a Value,
    stack: Vec<StackEntry<'a>>,
    strict: bool,
}

impl<'a> JsonDecodeBackend<'a> {
    pub fn new(root: &'a Value) -> Self {
        JsonDecodeBackend {
            root,
            stack: Vec::new(),
            strict: false,
        }
    }

    /// Like [`JsonDecodeBackend::new`], but `end_struct` rejects object
    /// members the traversal never visited.
    pub fn new_strict(root: &'a Value) -> Self {
        JsonDecodeBackend {
            strict: true,
            ..Self::new(root)
        }
    }

    /// Resolve the value the next call operates on. `consume` marks object
    /// members as visited for the strict leftover check; peeks pass `false`.
    fn lookup(&mut self, name: Option<&str>, consume: bool) -> Result<&'a Value, VisitError> {
        let strict = self.strict;
        match self.stack.last_mut() {
            None => Ok(self.root),
            Some(entry) => match entry.value {
                Value::Object(members) => {
                    let key = name.expect("field name required inside a struct");
                    let found = members
                        .get(key)
                        .ok_or_else(|| VisitError::missing_parameter(key))?;
                    if strict && consume {
                        entry.visited.insert(key.to_string());
                    }
                    Ok(found)
                }
                Value::Array(items) => {
                    let index = entry.cursor.expect("list element visited before next_list");
                    Ok(items
                        .get(index)
                        .expect("list element visited past the end of the sequence"))
                }
                _ => unreachable!("only containers are pushed"),
            },
        }
    }
}

impl<'a> Backend for JsonDecodeBackend<'a> {
    fn mode(&self) -> VisitMode {
        VisitMode::Decode
    }

    fn start_struct(&mut self, name: Option<&str>) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        if !value.is_object() {
            return Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "object",
            ));
        }
        self.stack.push(StackEntry::new(value));
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), VisitError> {
        let entry = self
            .stack
            .pop()
            .expect("end_struct without a matching start_struct");
        if self.strict {
            if let Value::Object(members) = entry.value {
                for key in members.keys() {
                    if !entry.visited.contains(key.as_str()) {
                        return Err(VisitError::invalid_parameter(key.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    fn start_list(&mut self, name: Option<&str>) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        if !value.is_array() {
            return Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "array",
            ));
        }
        self.stack.push(StackEntry::new(value));
        Ok(())
    }

    fn next_list(&mut self, _more: bool) -> bool {
        let entry = self.stack.last_mut().expect("next_list outside a list");
        let items = match entry.value {
            Value::Array(items) => items,
            _ => return false,
        };
        let next = match entry.cursor {
            None => 0,
            Some(index) => index + 1,
        };
        if next >= items.len() {
            return false;
        }
        entry.cursor = Some(next);
        true
    }

    fn end_list(&mut self) {
        let entry = self
            .stack
            .pop()
            .expect("end_list without a matching start_list");
        debug_assert!(entry.value.is_array());
    }

    fn type_i64(&mut self, name: Option<&str>, obj: &mut i64) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        match value.as_i64() {
            Some(n) => {
                *obj = n;
                Ok(())
            }
            None => Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "integer",
            )),
        }
    }

    fn type_u64(&mut self, name: Option<&str>, obj: &mut u64) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        match value.as_u64() {
            Some(n) => {
                *obj = n;
                Ok(())
            }
            None => Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "integer",
            )),
        }
    }

    fn type_bool(&mut self, name: Option<&str>, obj: &mut bool) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        match value.as_bool() {
            Some(b) => {
                *obj = b;
                Ok(())
            }
            None => Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "boolean",
            )),
        }
    }

    fn type_str(&mut self, name: Option<&str>, obj: &mut Option<String>) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        match value.as_str() {
            Some(s) => {
                *obj = Some(s.to_string());
                Ok(())
            }
            None => Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "string",
            )),
        }
    }

    fn type_number(&mut self, name: Option<&str>, obj: &mut f64) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        match value.as_f64() {
            Some(n) => {
                *obj = n;
                Ok(())
            }
            None => Err(VisitError::invalid_parameter_type(
                name_or_null(name),
                "number",
            )),
        }
    }

    fn type_any(&mut self, name: Option<&str>, obj: &mut Option<Value>) -> Result<(), VisitError> {
        let value = self.lookup(name, true)?;
        *obj = Some(value.clone());
        Ok(())
    }

    fn supports_implicit_struct(&self) -> bool {
        true
    }

    // Flattened structs read from the parent object, so the container stack
    // stays as it is.
    fn start_implicit_struct(&mut self) -> Result<(), VisitError> {
        Ok(())
    }

    fn end_implicit_struct(&mut self) {}

    fn optional(&mut self, name: Option<&str>, present: &mut bool) {
        *present = self.lookup(name, false).is_ok();
    }

    fn get_next_type(
        &mut self,
        name: Option<&str>,
        kind: &mut Option<ValueKind>,
    ) -> Result<(), VisitError> {
        let value = self.lookup(name, false)?;
        *kind = Some(ValueKind::of(value));
        Ok(())
    }
}
