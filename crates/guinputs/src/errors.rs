use thiserror::Error;

use crate::signature::ParamType;

/// Errors raised while registering a callable or assembling its arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("parameter '{param}' is an unsupported type: '{ty}'")]
    UnsupportedType { param: String, ty: ParamType },

    #[error("parameter name '{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("duplicate field key: {0}")]
    DuplicateField(String),

    #[error("parameter '{param}': {source}")]
    Conversion {
        param: String,
        #[source]
        source: ConversionError,
    },

    #[error("no value collected for parameter '{0}'")]
    MissingValue(String),

    #[error("no callable registered")]
    NotRegistered,

    #[error("argument '{name}' is not a {expected}")]
    ArgumentType { name: String, expected: &'static str },
}

/// A raw field value that cannot be turned into the declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{raw}' is not a valid {expected}")]
pub struct ConversionError {
    pub raw: String,
    pub expected: &'static str,
}

impl ConversionError {
    pub fn new(raw: impl Into<String>, expected: &'static str) -> Self {
        Self {
            raw: raw.into(),
            expected,
        }
    }
}
