//! List editor sub-window.
//!
//! Shows one input row per item plus a trailing empty row. Typing into the
//! last row appends a new empty one. Submitting converts every non-empty row
//! to the element type and overwrites the field's store entry; cancelling or
//! closing the window leaves the entry as it was.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::form::{FieldKey, SUBMIT_KEY};
use crate::layout::{Layout, Row, Widget};
use crate::router::{Flow, HandlerContext, WindowHandler};
use crate::store::ManualSlot;
use crate::toolkit::{Event, FieldValue, Values, WindowEvent, WindowId};
use crate::types::ElementKind;
use crate::validate::{filter, Filtered};
use crate::value::Value;

/// Container holding the item rows.
pub const ROWS_KEY: &str = "-ROWS-";
pub const STATUS_KEY: &str = "-STATUS-";
pub const CANCEL_KEY: &str = "-CANCEL-";

pub fn row_key(index: usize) -> String {
    format!("-ROW-{index}-")
}

fn row_index(key: &str) -> Option<usize> {
    key.strip_prefix("-ROW-")?.strip_suffix('-')?.parse().ok()
}

pub struct ListEditor {
    field: FieldKey,
    title: String,
    element: ElementKind,
    slot: ManualSlot,
    /// Number of rows currently in the window.
    rows: usize,
    flagged: Vec<String>,
}

impl ListEditor {
    pub fn new(field: FieldKey, label: &str, element: ElementKind, slot: ManualSlot) -> Self {
        let rows = slot.items().len() + 1;
        Self {
            field,
            title: format!("{label} items"),
            element,
            slot,
            rows,
            flagged: Vec::new(),
        }
    }

    /// Layout pre-filled with the current items of the field.
    pub fn layout(&self) -> Layout {
        let mut rows: Vec<Row> = self
            .slot
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| item_row(index, item.to_field_text()))
            .collect();
        rows.push(item_row(rows.len(), String::new()));

        Layout::new(self.title.clone())
            .container(ROWS_KEY, rows)
            .row(vec![Widget::Text {
                key: STATUS_KEY.into(),
                text: String::new(),
            }])
            .row(vec![
                Widget::Button {
                    key: SUBMIT_KEY.into(),
                    label: "Submit".into(),
                },
                Widget::Button {
                    key: CANCEL_KEY.into(),
                    label: "Cancel".into(),
                },
            ])
    }

    fn on_row_changed(
        &mut self,
        cx: &mut HandlerContext<'_>,
        window: WindowId,
        key: &str,
        index: usize,
        values: &Values,
    ) -> Result<()> {
        let raw = values.text(key).unwrap_or_default();
        let text = match self.element.numeric() {
            Some(kind) => {
                let filtered = filter(kind, raw);
                if let Filtered::Revert(kept) = &filtered {
                    cx.toolkit.update(window, key, FieldValue::Text(kept.clone()))?;
                }
                filtered.resolve(raw)
            }
            None => raw.to_string(),
        };

        if let Some(pos) = self.flagged.iter().position(|k| k == key) {
            self.flagged.swap_remove(pos);
            cx.toolkit.highlight(window, key, None)?;
        }

        if index + 1 == self.rows && !text.is_empty() {
            cx.toolkit
                .extend(window, ROWS_KEY, vec![item_row(self.rows, String::new())])?;
            self.rows += 1;
            debug!(field = %self.field, rows = self.rows, "list editor grew");
        }
        Ok(())
    }

    fn submit(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow> {
        let mut items = Vec::new();
        let mut failures = Vec::new();
        for index in 0..self.rows {
            let key = row_key(index);
            let text = event.values.text(&key).unwrap_or_default();
            if text.is_empty() {
                continue;
            }
            match self.element.convert(text) {
                Ok(item) => items.push(item),
                Err(err) => failures.push((key, err.to_string())),
            }
        }

        for key in self.flagged.drain(..) {
            cx.toolkit.highlight(event.window, &key, None)?;
        }

        if !failures.is_empty() {
            warn!(field = %self.field, invalid = failures.len(), "list items rejected");
            cx.toolkit.update(
                event.window,
                STATUS_KEY,
                FieldValue::Text(format!("{} invalid item(s)", failures.len())),
            )?;
            for (key, message) in failures {
                cx.toolkit.highlight(event.window, &key, Some(&message))?;
                self.flagged.push(key);
            }
            return Ok(Flow::Continue);
        }

        info!(field = %self.field, items = items.len(), "list updated");
        self.slot.set(Value::List(items));
        Ok(Flow::Stop)
    }
}

fn item_row(index: usize, text: String) -> Row {
    vec![Widget::Input {
        key: row_key(index),
        text,
        events: true,
    }]
}

impl WindowHandler for ListEditor {
    fn name(&self) -> &str {
        "list editor"
    }

    fn handle(&mut self, cx: &mut HandlerContext<'_>, event: &WindowEvent) -> Result<Flow> {
        match &event.event {
            Event::Closed => {
                debug!(field = %self.field, "list editor dismissed");
                Ok(Flow::Stop)
            }
            Event::Pressed(key) if key == CANCEL_KEY => {
                debug!(field = %self.field, "list editor cancelled");
                Ok(Flow::Stop)
            }
            Event::Pressed(key) if key == SUBMIT_KEY => self.submit(cx, event),
            Event::Changed(key) => {
                if let Some(index) = row_index(key) {
                    self.on_row_changed(cx, event.window, key, index, &event.values)?;
                }
                Ok(Flow::Continue)
            }
            Event::Pressed(_) => Ok(Flow::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Session, WindowRouter};
    use crate::store::ManualValueStore;
    use crate::testing::ScriptedToolkit;
    use crate::toolkit::Toolkit;
    use crate::types::FieldTag;
    use pretty_assertions::assert_eq;

    fn open(element: ElementKind, initial: Value) -> (ScriptedToolkit, WindowRouter, WindowId, ManualSlot) {
        let key = FieldKey::new("items", FieldTag::List);
        let mut store = ManualValueStore::new();
        let slot = store.ensure(&key, || initial);
        let editor = ListEditor::new(key, "items", element, slot.clone());
        let mut toolkit = ScriptedToolkit::new();
        let window = toolkit.create(&editor.layout()).unwrap();
        let router = WindowRouter::new(window, Box::new(editor));
        (toolkit, router, window, slot)
    }

    fn drain(toolkit: &mut ScriptedToolkit, router: &mut WindowRouter) {
        let mut session = Session::default();
        while toolkit.pending() > 0 {
            let event = toolkit.poll().unwrap();
            router.dispatch(toolkit, &mut session, event).unwrap();
        }
    }

    #[test]
    fn row_keys() {
        assert_eq!(row_key(3), "-ROW-3-");
        assert_eq!(row_index("-ROW-12-"), Some(12));
        assert_eq!(row_index("-ROWS-"), None);
    }

    #[test]
    fn typing_in_last_row_grows_the_editor() {
        let (mut toolkit, mut router, window, slot) = open(ElementKind::Str, Value::List(vec![]));
        toolkit
            .type_text(window, "-ROW-0-", "a")
            .type_text(window, "-ROW-1-", "b")
            .press(window, SUBMIT_KEY);
        drain(&mut toolkit, &mut router);

        assert_eq!(toolkit.rows_in(window, ROWS_KEY), 3);
        assert_eq!(slot.get(), Some(vec!["a", "b"].into()));
        assert!(!router.is_open(window));
    }

    #[test]
    fn opens_with_existing_items() {
        let (toolkit, _router, window, _slot) = open(ElementKind::Int, vec![1i64, 2].into());
        assert_eq!(toolkit.rows_in(window, ROWS_KEY), 3);
        assert_eq!(toolkit.text(window, "-ROW-1-").as_deref(), Some("2"));
        assert_eq!(toolkit.text(window, "-ROW-2-").as_deref(), Some(""));
    }

    #[test]
    fn numeric_rows_are_filtered_while_typing() {
        let (mut toolkit, mut router, window, slot) = open(ElementKind::Int, Value::List(vec![]));
        toolkit
            .type_text(window, "-ROW-0-", "4x2")
            .press(window, SUBMIT_KEY);
        drain(&mut toolkit, &mut router);
        assert_eq!(slot.get(), Some(vec![42i64].into()));
    }

    #[test]
    fn empty_rows_are_skipped() {
        let (mut toolkit, mut router, window, slot) = open(ElementKind::Str, Value::List(vec![]));
        toolkit
            .type_text(window, "-ROW-0-", "a")
            .type_text(window, "-ROW-1-", "b")
            .set_text(window, "-ROW-0-", "")
            .press(window, SUBMIT_KEY);
        drain(&mut toolkit, &mut router);
        assert_eq!(slot.get(), Some(vec!["b"].into()));
    }

    #[test]
    fn cancel_and_close_keep_previous_items() {
        let (mut toolkit, mut router, window, slot) = open(ElementKind::Str, vec!["keep"].into());
        toolkit.type_text(window, "-ROW-1-", "new").press(window, CANCEL_KEY);
        drain(&mut toolkit, &mut router);
        assert_eq!(slot.get(), Some(vec!["keep"].into()));

        let (mut toolkit, mut router, window, slot) = open(ElementKind::Str, vec!["keep"].into());
        toolkit.type_text(window, "-ROW-1-", "new").close_window(window);
        drain(&mut toolkit, &mut router);
        assert_eq!(slot.get(), Some(vec!["keep"].into()));
    }

    #[test]
    fn unconvertible_rows_block_submission() {
        let (mut toolkit, mut router, window, slot) = open(ElementKind::Float, Value::List(vec![]));
        toolkit
            .type_text(window, "-ROW-0-", "1.5")
            .type_text(window, "-ROW-1-", "-")
            .press(window, SUBMIT_KEY);
        drain(&mut toolkit, &mut router);

        assert!(router.is_open(window));
        assert!(toolkit.highlighted(window, "-ROW-1-").is_some());
        assert_eq!(
            toolkit.text(window, STATUS_KEY).as_deref(),
            Some("1 invalid item(s)")
        );
        assert_eq!(slot.get(), Some(Value::List(vec![])));

        toolkit
            .type_text(window, "-ROW-1-", "2")
            .press(window, SUBMIT_KEY);
        drain(&mut toolkit, &mut router);
        assert_eq!(toolkit.highlighted(window, "-ROW-1-"), None);
        assert_eq!(slot.get(), Some(vec![1.5, -2.0].into()));
    }
}
