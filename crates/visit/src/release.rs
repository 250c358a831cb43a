//! Backend for the release mode.
//!
//! Rust ownership reclaims most storage the moment a value drops, so this
//! backend has little to do: it accepts every call, takes heap values out of
//! their slots so they drop here, and lets the caller's link chain drive
//! list traversal. It exists so generated traversal code can run the same
//! call sequence in all three modes.

use serde_json::Value;

use crate::backend::{Backend, VisitMode};
use crate::error::VisitError;

#[derive(Debug, Default)]
pub struct ReleaseBackend;

impl Backend for ReleaseBackend {
    fn mode(&self) -> VisitMode {
        VisitMode::Release
    }

    fn start_struct(&mut self, _name: Option<&str>) -> Result<(), VisitError> {
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), VisitError> {
        Ok(())
    }

    fn start_list(&mut self, _name: Option<&str>) -> Result<(), VisitError> {
        Ok(())
    }

    fn next_list(&mut self, more: bool) -> bool {
        more
    }

    fn end_list(&mut self) {}

    fn type_i64(&mut self, _name: Option<&str>, _obj: &mut i64) -> Result<(), VisitError> {
        Ok(())
    }

    fn type_u64(&mut self, _name: Option<&str>, _obj: &mut u64) -> Result<(), VisitError> {
        Ok(())
    }

    fn type_bool(&mut self, _name: Option<&str>, _obj: &mut bool) -> Result<(), VisitError> {
        Ok(())
    }

    fn type_str(&mut self, _name: Option<&str>, obj: &mut Option<String>) -> Result<(), VisitError> {
        obj.take();
        Ok(())
    }

    fn type_number(&mut self, _name: Option<&str>, _obj: &mut f64) -> Result<(), VisitError> {
        Ok(())
    }

    fn type_any(&mut self, _name: Option<&str>, obj: &mut Option<Value>) -> Result<(), VisitError> {
        obj.take();
        Ok(())
    }
}
