//! Declared parameter lists.
//!
//! A `Signature` is the explicit stand-in for a function's parameter list:
//! name, declared type, optional default and passing mode per parameter.
//!
//! ```ignore
//! use guinputs::{Param, Signature};
//!
//! let sig = Signature::new("cli")
//!     .param(Param::of::<Vec<String>>("names"))
//!     .param(Param::of::<bool>("comma").default(true))
//!     .param(Param::of::<i64>("times").default(1));
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::value::Value;

/// Declared type of a parameter.
///
/// `Other` carries the name of any type the form system has no widget for;
/// the type mapper rejects it at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
    Path,
    List(Box<ParamType>),
    Other(String),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Str => write!(f, "str"),
            ParamType::Int => write!(f, "int"),
            ParamType::Float => write!(f, "float"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Path => write!(f, "path"),
            ParamType::List(inner) => write!(f, "list[{inner}]"),
            ParamType::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Rust types with a known declared type.
pub trait Declared {
    fn declared() -> ParamType;
}

impl Declared for String {
    fn declared() -> ParamType {
        ParamType::Str
    }
}

impl Declared for i64 {
    fn declared() -> ParamType {
        ParamType::Int
    }
}

impl Declared for f64 {
    fn declared() -> ParamType {
        ParamType::Float
    }
}

impl Declared for bool {
    fn declared() -> ParamType {
        ParamType::Bool
    }
}

impl Declared for PathBuf {
    fn declared() -> ParamType {
        ParamType::Path
    }
}

impl<T: Declared> Declared for Vec<T> {
    fn declared() -> ParamType {
        ParamType::List(Box::new(T::declared()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassingMode {
    /// Passed by position only.
    Positional,
    /// Passed by name (covers positional-or-named parameters as well).
    #[default]
    Named,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<Value>,
    pub mode: PassingMode,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            mode: PassingMode::Named,
        }
    }

    /// Parameter whose declared type follows from a Rust type.
    pub fn of<T: Declared>(name: impl Into<String>) -> Self {
        Self::new(name, T::declared())
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn positional(mut self) -> Self {
        self.mode = PassingMode::Positional;
        self
    }

    pub fn is_positional(&self) -> bool {
        self.mode == PassingMode::Positional
    }
}

/// Ordered parameter list of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Parameter names must be plain identifiers so field keys stay parseable.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
