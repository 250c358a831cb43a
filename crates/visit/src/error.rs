use thiserror::Error;

/// Coarse classification carried by every [`VisitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    GenericError,
    InvalidParameter,
    InvalidParameterValue,
}

/// Structured error produced by the dispatch layer or a backend.
///
/// The dispatch layer itself only ever builds [`VisitError::InvalidParameter`]
/// and [`VisitError::InvalidParameterValue`]; the remaining variants exist for
/// backends reporting malformed input. Errors move through `Result`; a
/// caller that ignores one simply drops it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisitError {
    #[error("Invalid parameter '{0}'")]
    InvalidParameter(String),

    #[error("Parameter '{name}' expects {expected}")]
    InvalidParameterValue { name: String, expected: String },

    #[error("Invalid parameter type for '{name}', expected: {expected}")]
    InvalidParameterType { name: String, expected: String },

    #[error("Parameter '{0}' is missing")]
    MissingParameter(String),

    #[error("{0}")]
    Backend(String),
}

impl VisitError {
    pub fn invalid_parameter(name: impl Into<String>) -> Self {
        VisitError::InvalidParameter(name.into())
    }

    pub fn invalid_parameter_value(name: impl Into<String>, expected: impl Into<String>) -> Self {
        VisitError::InvalidParameterValue {
            name: name.into(),
            expected: expected.into(),
        }
    }

    pub fn invalid_parameter_type(name: impl Into<String>, expected: impl Into<String>) -> Self {
        VisitError::InvalidParameterType {
            name: name.into(),
            expected: expected.into(),
        }
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        VisitError::MissingParameter(name.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        VisitError::Backend(message.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            VisitError::InvalidParameter(_) => ErrorClass::InvalidParameter,
            VisitError::InvalidParameterValue { .. } => ErrorClass::InvalidParameterValue,
            _ => ErrorClass::GenericError,
        }
    }
}

/// Render an absent field name the way the error templates expect it.
pub fn name_or_null(name: Option<&str>) -> &str {
    name.unwrap_or("null")
}
