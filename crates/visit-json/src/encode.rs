//! Encode backend building a JSON value.
//!
//! Aggregates open a fresh container on a stack; leaves are added to the top
//! container (or become the root when none is open). Closing an aggregate
//! pops it and attaches it to its parent under the name it was opened with.

use serde_json::{Map, Value};

use schema_visit::{Backend, VisitError, VisitMode};

enum Open {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

struct Container {
    name: Option<String>,
    open: Open,
}

#[derive(Default)]
pub struct JsonEncodeBackend {
    stack: Vec<Container>,
    root: Option<Value>,
}

impl JsonEncodeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished value. `Null` if the traversal never visited anything.
    pub fn into_value(self) -> Value {
        debug_assert!(self.stack.is_empty(), "unbalanced traversal");
        self.root.unwrap_or(Value::Null)
    }

    fn add(&mut self, name: Option<&str>, value: Value) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
            Some(container) => match &mut container.open {
                Open::Object(members) => {
                    let key = name.expect("field name required inside a struct");
                    members.insert(key.to_string(), value);
                }
                Open::Array(items) => items.push(value),
            },
        }
    }
}

impl Backend for JsonEncodeBackend {
    fn mode(&self) -> VisitMode {
        VisitMode::Encode
    }

    fn start_struct(&mut self, name: Option<&str>) -> Result<(), VisitError> {
        self.stack.push(Container {
            name: name.map(String::from),
            open: Open::Object(Map::new()),
        });
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), VisitError> {
        let container = self
            .stack
            .pop()
            .expect("end_struct without a matching start_struct");
        let value = match container.open {
            Open::Object(members) => Value::Object(members),
            Open::Array(_) => unreachable!("end_struct closed a list"),
        };
        self.add(container.name.as_deref(), value);
        Ok(())
    }

    fn start_list(&mut self, name: Option<&str>) -> Result<(), VisitError> {
        self.stack.push(Container {
            name: name.map(String::from),
            open: Open::Array(Vec::new()),
        });
        Ok(())
    }

    fn next_list(&mut self, more: bool) -> bool {
        more
    }

    fn end_list(&mut self) {
        let container = self
            .stack
            .pop()
            .expect("end_list without a matching start_list");
        let value = match container.open {
            Open::Array(items) => Value::Array(items),
            Open::Object(_) => unreachable!("end_list closed a struct"),
        };
        self.add(container.name.as_deref(), value);
    }

    fn type_i64(&mut self, name: Option<&str>, obj: &mut i64) -> Result<(), VisitError> {
        self.add(name, Value::from(*obj));
        Ok(())
    }

    fn type_u64(&mut self, name: Option<&str>, obj: &mut u64) -> Result<(), VisitError> {
        self.add(name, Value::from(*obj));
        Ok(())
    }

    fn type_bool(&mut self, name: Option<&str>, obj: &mut bool) -> Result<(), VisitError> {
        self.add(name, Value::from(*obj));
        Ok(())
    }

    fn type_str(&mut self, name: Option<&str>, obj: &mut Option<String>) -> Result<(), VisitError> {
        let s = obj.as_deref().unwrap_or("");
        self.add(name, Value::from(s));
        Ok(())
    }

    // Non-finite floats have no JSON notation and encode as null.
    fn type_number(&mut self, name: Option<&str>, obj: &mut f64) -> Result<(), VisitError> {
        self.add(name, Value::from(*obj));
        Ok(())
    }

    fn type_any(&mut self, name: Option<&str>, obj: &mut Option<Value>) -> Result<(), VisitError> {
        let value = obj.clone().unwrap_or(Value::Null);
        self.add(name, value);
        Ok(())
    }
}
