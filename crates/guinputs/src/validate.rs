//! Live numeric input filter.
//!
//! Runs on every change of an integer or float field. Text that parses is
//! accepted; text that does not parse is still accepted when its last
//! character may legitimately precede more input (`-`, `_`, and `.` for
//! floats). Anything else loses its last character.

use tracing::trace;

use crate::types::NumericKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filtered {
    Accept,
    /// Replace the field text with this value.
    Revert(String),
}

impl Filtered {
    /// Text the field holds after the filter was applied.
    pub fn resolve(self, original: &str) -> String {
        match self {
            Filtered::Accept => original.to_string(),
            Filtered::Revert(text) => text,
        }
    }
}

pub fn filter(kind: NumericKind, text: &str) -> Filtered {
    let Some(last) = text.chars().last() else {
        return Filtered::Accept;
    };
    if kind.parses(text) || kind.partial_chars().contains(&last) {
        return Filtered::Accept;
    }

    let mut kept = text.to_string();
    kept.pop();
    trace!(?kind, rejected = %last, "reverting numeric input");
    Filtered::Revert(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_float, parse_int};

    /// Type `input` one character at a time, applying the filter after each.
    fn type_chars(kind: NumericKind, input: &str) -> Vec<String> {
        let mut field = String::new();
        let mut history = Vec::new();
        for c in input.chars() {
            field.push(c);
            field = filter(kind, &field).resolve(&field);
            history.push(field.clone());
        }
        history
    }

    #[test]
    fn minus_then_letter_then_digit() {
        assert_eq!(filter(NumericKind::Integer, "-"), Filtered::Accept);
        assert_eq!(
            filter(NumericKind::Integer, "-a"),
            Filtered::Revert("-".into())
        );
        assert_eq!(filter(NumericKind::Integer, "-5"), Filtered::Accept);
    }

    #[test]
    fn empty_text_is_accepted() {
        assert_eq!(filter(NumericKind::Float, ""), Filtered::Accept);
    }

    #[test]
    fn trailing_dot_only_for_floats() {
        assert_eq!(filter(NumericKind::Float, "3."), Filtered::Accept);
        assert_eq!(filter(NumericKind::Float, "-."), Filtered::Accept);
        assert_eq!(
            filter(NumericKind::Integer, "3."),
            Filtered::Revert("3".into())
        );
    }

    #[test]
    fn separators_are_partial_input() {
        assert_eq!(filter(NumericKind::Integer, "1_"), Filtered::Accept);
        assert_eq!(filter(NumericKind::Integer, "1_0"), Filtered::Accept);
    }

    #[test]
    fn integer_field_is_always_valid_or_partial() {
        let inputs = ["-12a3", "abc", "1_000x", "--5", "7.5", "+4", "12 3", "9e9"];
        for input in inputs {
            for text in type_chars(NumericKind::Integer, input) {
                let ok = text.is_empty()
                    || parse_int(&text).is_some()
                    || text.ends_with(['-', '_']);
                assert!(ok, "{input:?} left field as {text:?}");
            }
        }
    }

    #[test]
    fn float_field_is_always_valid_or_partial() {
        let inputs = ["-0.5x", "1.2.3", "..", "3e-2", "abc", "1_0.5"];
        for input in inputs {
            for text in type_chars(NumericKind::Float, input) {
                let ok = text.is_empty()
                    || parse_float(&text).is_some()
                    || text.ends_with(['-', '_', '.']);
                assert!(ok, "{input:?} left field as {text:?}");
            }
        }
    }

    #[test]
    fn letters_never_survive() {
        assert_eq!(type_chars(NumericKind::Integer, "a1b2").last().unwrap(), "12");
        assert_eq!(type_chars(NumericKind::Float, "x.5y").last().unwrap(), ".5");
    }
}
