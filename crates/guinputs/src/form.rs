//! Form compiler: signature → layout + binding tables.
//!
//! Every parameter gets one row (label + widget) and one [`FieldBinding`]
//! keyed by a [`FieldKey`] of the form `-{name}-{TAG}-`. Positional-only
//! parameters are routed to `arg_keys` in declaration order, all others to
//! `kwarg_keys`. A single submit button closes the layout.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::FormError;
use crate::layout::{Layout, Row, Widget};
use crate::signature::{is_identifier, Param, Signature};
use crate::toolkit::FieldValue;
use crate::types::{map_type, Converter, FieldTag, WidgetKind, WidgetSpec};
use crate::value::Value;

/// Key of the submission button of the main form.
pub const SUBMIT_KEY: &str = "-SUBMIT-";

/// Stable widget key of one parameter, unique per form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(name: &str, tag: FieldTag) -> Self {
        Self(format!("-{name}-{tag}-"))
    }

    /// Parse a raw widget key; `None` for keys that do not end in a known tag.
    pub fn parse(raw: &str) -> Option<Self> {
        let (name, tag) = split_key(raw)?;
        FieldTag::from_str(tag).ok()?;
        is_identifier(name).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tag(&self) -> FieldTag {
        split_key(&self.0)
            .and_then(|(_, tag)| FieldTag::from_str(tag).ok())
            .unwrap_or(FieldTag::Str)
    }

    pub fn param_name(&self) -> &str {
        split_key(&self.0).map(|(name, _)| name).unwrap_or_default()
    }

    /// Key of the read-only text shown next to a trigger button.
    pub fn display_key(&self) -> String {
        format!("{}SHOWN-", self.0)
    }
}

fn split_key(raw: &str) -> Option<(&str, &str)> {
    raw.strip_prefix('-')?.strip_suffix('-')?.rsplit_once('-')
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Links one parameter to its widget and converter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub key: FieldKey,
    pub param: Param,
    pub widget: WidgetSpec,
    pub converter: Converter,
}

impl FieldBinding {
    pub fn is_widget_backed(&self) -> bool {
        self.widget.kind.is_widget_backed()
    }

    /// Convert a widget read.
    ///
    /// Empty numeric text falls back to the parameter default, if any.
    pub fn read(&self, raw: &FieldValue) -> Result<Value, FormError> {
        if let (Some(_), FieldValue::Text(text)) = (self.converter.numeric(), raw) {
            if text.trim().is_empty() {
                if let Some(default) = &self.param.default {
                    return Ok(default.clone());
                }
            }
        }
        self.converter
            .convert(raw)
            .map_err(|source| FormError::Conversion {
                param: self.param.name.clone(),
                source,
            })
    }

    /// Value used when nothing was collected for this field.
    pub fn fallback(&self) -> Option<Value> {
        match (&self.param.default, self.converter) {
            (Some(default), _) => Some(default.clone()),
            (None, Converter::List(_)) => Some(Value::List(Vec::new())),
            (None, _) => None,
        }
    }

    fn row(&self) -> Row {
        let label = Widget::Label(self.param.name.clone());
        let default_text = self
            .widget
            .default
            .as_ref()
            .map(Value::to_field_text)
            .unwrap_or_default();
        let key = self.key.to_string();

        match self.widget.kind {
            WidgetKind::TextInput => vec![
                label,
                Widget::Input {
                    key,
                    text: default_text,
                    events: self.widget.live_validation,
                },
            ],
            WidgetKind::Checkbox => vec![
                label,
                Widget::Checkbox {
                    key,
                    checked: matches!(self.widget.default, Some(Value::Bool(true))),
                },
            ],
            WidgetKind::FilePicker => vec![
                label,
                Widget::Text {
                    key: self.key.display_key(),
                    text: default_text,
                },
                Widget::Button {
                    key,
                    label: "Browse".into(),
                },
            ],
            WidgetKind::ListEditor => vec![
                label,
                Widget::Button {
                    key,
                    label: "Edit items".into(),
                },
            ],
        }
    }
}

/// Output of [`compile`]; immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledForm {
    pub title: String,
    pub layout: Layout,
    pub bindings: IndexMap<FieldKey, FieldBinding>,
    pub arg_keys: Vec<FieldKey>,
    pub kwarg_keys: IndexMap<FieldKey, String>,
}

impl CompiledForm {
    pub fn binding(&self, key: &str) -> Option<&FieldBinding> {
        self.bindings.get(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Compile a signature into a form titled `display_name` (or the signature's name).
pub fn compile(signature: &Signature, display_name: Option<&str>) -> Result<CompiledForm, FormError> {
    let title = display_name.unwrap_or(&signature.name).to_string();
    let mut layout = Layout::new(title.clone());
    let mut bindings = IndexMap::new();
    let mut arg_keys = Vec::new();
    let mut kwarg_keys = IndexMap::new();

    for param in &signature.params {
        if !is_identifier(&param.name) {
            return Err(FormError::InvalidName(param.name.clone()));
        }
        let (widget, converter) = map_type(param)?;
        let key = FieldKey::new(&param.name, converter.tag());
        if bindings.contains_key(&key) {
            return Err(FormError::DuplicateField(key.to_string()));
        }

        let binding = FieldBinding {
            key: key.clone(),
            param: param.clone(),
            widget,
            converter,
        };
        layout = layout.row(binding.row());

        if param.is_positional() {
            arg_keys.push(key.clone());
        } else {
            kwarg_keys.insert(key.clone(), param.name.clone());
        }
        bindings.insert(key, binding);
    }

    layout = layout.row(vec![Widget::Button {
        key: SUBMIT_KEY.into(),
        label: "Submit".into(),
    }]);

    debug!(
        form = %title,
        fields = bindings.len(),
        positional = arg_keys.len(),
        "compiled form"
    );

    Ok(CompiledForm {
        title,
        layout,
        bindings,
        arg_keys,
        kwarg_keys,
    })
}
