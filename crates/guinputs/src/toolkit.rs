//! Seam to the windowing toolkit.
//!
//! The core never renders anything itself. A toolkit creates windows from a
//! [`Layout`], blocks in [`Toolkit::poll`] until any open window produces an
//! event and applies the handful of mutations handlers need.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use indexmap::IndexMap;

use crate::layout::{Layout, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Raw value held by a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Checked(b) => write!(f, "{b}"),
        }
    }
}

/// Snapshot of all value-bearing widgets of one window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(IndexMap<String, FieldValue>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Text of an input widget; `None` for missing keys and checkboxes.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The window's close button (or equivalent) was used.
    Closed,
    /// An input with events enabled changed.
    Changed(String),
    /// A button was pressed.
    Pressed(String),
}

impl Event {
    pub fn key(&self) -> Option<&str> {
        match self {
            Event::Closed => None,
            Event::Changed(key) | Event::Pressed(key) => Some(key),
        }
    }
}

/// One event together with the current values of its source window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: WindowId,
    pub event: Event,
    pub values: Values,
}

pub trait Toolkit {
    /// Open a window for `layout`.
    fn create(&mut self, layout: &Layout) -> Result<WindowId>;

    /// Block until the next event of any open window.
    fn poll(&mut self) -> Result<WindowEvent>;

    /// Replace the value of a widget.
    fn update(&mut self, window: WindowId, key: &str, value: FieldValue) -> Result<()>;

    /// Append rows to a named container.
    fn extend(&mut self, window: WindowId, container: &str, rows: Vec<Row>) -> Result<()>;

    /// Mark a widget as invalid with a message, or clear the mark with `None`.
    fn highlight(&mut self, window: WindowId, key: &str, error: Option<&str>) -> Result<()>;

    fn close(&mut self, window: WindowId) -> Result<()>;

    /// Modal file chooser; `None` when the user cancelled.
    fn open_file_dialog(&mut self) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_text_ignores_checkboxes() {
        let values: Values = [
            ("-name-STR-", FieldValue::Text("Ann".into())),
            ("-comma-BOOL-", FieldValue::Checked(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(values.text("-name-STR-"), Some("Ann"));
        assert_eq!(values.text("-comma-BOOL-"), None);
        assert!(values.contains("-comma-BOOL-"));
    }
}
