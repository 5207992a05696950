//! Type mapper: declared parameter type → widget specification + converter.
//!
//! The mapping is total over the supported variants of [`ParamType`]; anything
//! else (including `list[bool]` and nested lists) is rejected with
//! [`FormError::UnsupportedType`] before a form is built.

use std::path::PathBuf;

use strum::{Display, EnumString};

use crate::errors::{ConversionError, FormError};
use crate::signature::{Param, ParamType};
use crate::toolkit::FieldValue;
use crate::value::Value;

/// Type tag embedded in a field key (`-{name}-{TAG}-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum FieldTag {
    Str,
    Int,
    Float,
    Bool,
    Path,
    List,
}

/// Kind of widget a parameter is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Single-line text input.
    TextInput,
    Checkbox,
    /// Button opening the toolkit's file chooser, plus a display text.
    FilePicker,
    /// Button opening a list editor sub-window.
    ListEditor,
}

impl WidgetKind {
    /// Whether the widget's value comes back in a window read.
    pub fn is_widget_backed(self) -> bool {
        matches!(self, WidgetKind::TextInput | WidgetKind::Checkbox)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub kind: WidgetKind,
    pub default: Option<Value>,
    /// Per-keystroke numeric filtering (see [`crate::validate`]).
    pub live_validation: bool,
}

/// Numeric flavours understood by the live input filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

impl NumericKind {
    /// Characters that may end an incomplete number, e.g. `-` before digits.
    pub fn partial_chars(self) -> &'static [char] {
        match self {
            NumericKind::Integer => &['-', '_'],
            NumericKind::Float => &['-', '_', '.'],
        }
    }

    pub fn parses(self, text: &str) -> bool {
        match self {
            NumericKind::Integer => parse_int(text).is_some(),
            NumericKind::Float => parse_float(text).is_some(),
        }
    }
}

/// Element type of a list parameter, converted one row at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Str,
    Int,
    Float,
    Path,
}

impl ElementKind {
    fn from_param_type(ty: &ParamType) -> Option<Self> {
        match ty {
            ParamType::Str => Some(ElementKind::Str),
            ParamType::Int => Some(ElementKind::Int),
            ParamType::Float => Some(ElementKind::Float),
            ParamType::Path => Some(ElementKind::Path),
            _ => None,
        }
    }

    pub fn numeric(self) -> Option<NumericKind> {
        match self {
            ElementKind::Int => Some(NumericKind::Integer),
            ElementKind::Float => Some(NumericKind::Float),
            ElementKind::Str | ElementKind::Path => None,
        }
    }

    pub fn convert(self, raw: &str) -> Result<Value, ConversionError> {
        match self {
            ElementKind::Str => Ok(Value::Str(raw.to_string())),
            ElementKind::Int => parse_int(raw)
                .map(Value::Int)
                .ok_or_else(|| ConversionError::new(raw, "integer")),
            ElementKind::Float => parse_float(raw)
                .map(Value::Float)
                .ok_or_else(|| ConversionError::new(raw, "float")),
            ElementKind::Path => Ok(Value::Path(PathBuf::from(raw))),
        }
    }
}

/// Turns a field's raw stored representation into the typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Text,
    Integer,
    Float,
    Flag,
    Path,
    List(ElementKind),
}

impl Converter {
    pub fn tag(self) -> FieldTag {
        match self {
            Converter::Text => FieldTag::Str,
            Converter::Integer => FieldTag::Int,
            Converter::Float => FieldTag::Float,
            Converter::Flag => FieldTag::Bool,
            Converter::Path => FieldTag::Path,
            Converter::List(_) => FieldTag::List,
        }
    }

    pub fn numeric(self) -> Option<NumericKind> {
        match self {
            Converter::Integer => Some(NumericKind::Integer),
            Converter::Float => Some(NumericKind::Float),
            _ => None,
        }
    }

    /// Convert a widget read.
    pub fn convert(self, raw: &FieldValue) -> Result<Value, ConversionError> {
        match (self, raw) {
            (Converter::Flag, FieldValue::Checked(b)) => Ok(Value::Bool(*b)),
            (Converter::Text, FieldValue::Text(s)) => ElementKind::Str.convert(s),
            (Converter::Integer, FieldValue::Text(s)) => ElementKind::Int.convert(s),
            (Converter::Float, FieldValue::Text(s)) => ElementKind::Float.convert(s),
            (Converter::Path, FieldValue::Text(s)) => ElementKind::Path.convert(s),
            (other, raw) => Err(ConversionError::new(
                raw.to_string(),
                other.expected_name(),
            )),
        }
    }

    fn expected_name(self) -> &'static str {
        match self {
            Converter::Text => "string",
            Converter::Integer => "integer",
            Converter::Float => "float",
            Converter::Flag => "boolean",
            Converter::Path => "path",
            Converter::List(_) => "list",
        }
    }
}

/// Map a declared parameter to its widget and converter.
pub fn map_type(param: &Param) -> Result<(WidgetSpec, Converter), FormError> {
    let (kind, converter) = match &param.ty {
        ParamType::Str => (WidgetKind::TextInput, Converter::Text),
        ParamType::Int => (WidgetKind::TextInput, Converter::Integer),
        ParamType::Float => (WidgetKind::TextInput, Converter::Float),
        ParamType::Bool => (WidgetKind::Checkbox, Converter::Flag),
        ParamType::Path => (WidgetKind::FilePicker, Converter::Path),
        ParamType::List(inner) => match ElementKind::from_param_type(inner) {
            Some(element) => (WidgetKind::ListEditor, Converter::List(element)),
            None => return Err(unsupported(param)),
        },
        ParamType::Other(_) => return Err(unsupported(param)),
    };

    let spec = WidgetSpec {
        kind,
        default: param.default.clone(),
        live_validation: converter.numeric().is_some(),
    };
    Ok((spec, converter))
}

fn unsupported(param: &Param) -> FormError {
    FormError::UnsupportedType {
        param: param.name.clone(),
        ty: param.ty.clone(),
    }
}

/// Strip `_` digit separators, rejecting leading, trailing or doubled ones
/// and separators next to anything but digits.
fn strip_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return Some(text.to_string());
    }
    let chars: Vec<char> = text.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if *c != '_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(text.replace('_', ""))
}

/// Integer literal parse: surrounding whitespace, optional sign, `_` separators.
pub fn parse_int(text: &str) -> Option<i64> {
    let cleaned = strip_separators(text.trim())?;
    cleaned.parse::<i64>().ok()
}

/// Float literal parse with the same separator rules as [`parse_int`].
pub fn parse_float(text: &str) -> Option<f64> {
    let cleaned = strip_separators(text.trim())?;
    cleaned.parse::<f64>().ok()
}
