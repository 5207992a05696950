//! Headless [`Toolkit`] driven by a queued script of user actions.
//!
//! Actions are applied lazily when [`Toolkit::poll`] is called, so handler
//! updates made between two events are visible to the next action. Typing
//! goes character by character; every keystroke into an input with events
//! enabled produces one `Changed` event carrying a fresh value snapshot.
//! Inputs without events and checkboxes change silently.
//!
//! ```
//! use guinputs::layout::{Layout, Widget};
//! use guinputs::testing::ScriptedToolkit;
//! use guinputs::toolkit::{Event, Toolkit};
//!
//! let mut toolkit = ScriptedToolkit::new();
//! let window = toolkit
//!     .create(&Layout::new("t").row(vec![Widget::Button {
//!         key: "-GO-".into(),
//!         label: "Go".into(),
//!     }]))
//!     .unwrap();
//! toolkit.press(window, "-GO-");
//! assert_eq!(toolkit.poll().unwrap().event, Event::Pressed("-GO-".into()));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use indexmap::IndexMap;

use crate::layout::{Element, Layout, Row, Widget};
use crate::toolkit::{Event, FieldValue, Toolkit, Values, WindowEvent, WindowId};

#[derive(Debug, Clone)]
enum Action {
    Type { window: WindowId, key: String, ch: char },
    SetText { window: WindowId, key: String, text: String },
    Toggle { window: WindowId, key: String },
    Press { window: WindowId, key: String },
    Close { window: WindowId },
    Raw(WindowEvent),
}

#[derive(Debug)]
struct ScriptedWindow {
    layout: Layout,
    values: Values,
    texts: HashMap<String, String>,
    emitting: HashSet<String>,
    highlights: HashMap<String, String>,
    open: bool,
}

impl ScriptedWindow {
    fn new(layout: &Layout) -> Self {
        let mut window = Self {
            layout: layout.clone(),
            values: Values::new(),
            texts: HashMap::new(),
            emitting: HashSet::new(),
            highlights: HashMap::new(),
            open: true,
        };
        for widget in layout.widgets() {
            window.register(widget);
        }
        window
    }

    fn register(&mut self, widget: &Widget) {
        match widget {
            Widget::Input { key, text, events } => {
                self.values.insert(key.clone(), FieldValue::Text(text.clone()));
                if *events {
                    self.emitting.insert(key.clone());
                }
            }
            Widget::Checkbox { key, checked } => {
                self.values.insert(key.clone(), FieldValue::Checked(*checked));
            }
            Widget::Text { key, text } => {
                self.texts.insert(key.clone(), text.clone());
            }
            Widget::Label(_) | Widget::Button { .. } => {}
        }
    }

    fn input_text(&self, key: &str) -> Result<String> {
        self.values
            .text(key)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("no input '{key}'"))
    }
}

#[derive(Debug, Default)]
pub struct ScriptedToolkit {
    windows: IndexMap<WindowId, ScriptedWindow>,
    next_id: u64,
    script: VecDeque<Action>,
    dialog_answers: VecDeque<Option<PathBuf>>,
    dialogs_opened: usize,
}

impl ScriptedToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type `text` into an input, one keystroke per character.
    pub fn type_text(&mut self, window: WindowId, key: &str, text: &str) -> &mut Self {
        for ch in text.chars() {
            self.script.push_back(Action::Type {
                window,
                key: key.to_string(),
                ch,
            });
        }
        self
    }

    /// Replace the whole text of an input in one change (paste, clear).
    pub fn set_text(&mut self, window: WindowId, key: &str, text: &str) -> &mut Self {
        self.script.push_back(Action::SetText {
            window,
            key: key.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn toggle(&mut self, window: WindowId, key: &str) -> &mut Self {
        self.script.push_back(Action::Toggle {
            window,
            key: key.to_string(),
        });
        self
    }

    pub fn press(&mut self, window: WindowId, key: &str) -> &mut Self {
        self.script.push_back(Action::Press {
            window,
            key: key.to_string(),
        });
        self
    }

    /// Use the window's close button.
    pub fn close_window(&mut self, window: WindowId) -> &mut Self {
        self.script.push_back(Action::Close { window });
        self
    }

    /// Deliver `event` verbatim.
    pub fn push_event(&mut self, event: WindowEvent) -> &mut Self {
        self.script.push_back(Action::Raw(event));
        self
    }

    /// Queue the result of the next file dialog; unanswered dialogs are cancelled.
    pub fn answer_file_dialog(&mut self, answer: Option<PathBuf>) -> &mut Self {
        self.dialog_answers.push_back(answer);
        self
    }

    /// Actions not yet applied.
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    pub fn is_open(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.open)
    }

    pub fn open_count(&self) -> usize {
        self.windows.values().filter(|w| w.open).count()
    }

    /// Number of windows created so far.
    pub fn created(&self) -> usize {
        self.windows.len()
    }

    pub fn dialogs_opened(&self) -> usize {
        self.dialogs_opened
    }

    /// Current layout of a window, including appended rows.
    pub fn layout(&self, window: WindowId) -> Option<&Layout> {
        self.windows.get(&window).map(|w| &w.layout)
    }

    /// Text of an input or display text.
    pub fn text(&self, window: WindowId, key: &str) -> Option<String> {
        let w = self.windows.get(&window)?;
        w.values
            .text(key)
            .map(str::to_string)
            .or_else(|| w.texts.get(key).cloned())
    }

    pub fn checked(&self, window: WindowId, key: &str) -> Option<bool> {
        match self.windows.get(&window)?.values.get(key) {
            Some(FieldValue::Checked(b)) => Some(*b),
            _ => None,
        }
    }

    /// Error message a widget is currently highlighted with.
    pub fn highlighted(&self, window: WindowId, key: &str) -> Option<&str> {
        self.windows
            .get(&window)?
            .highlights
            .get(key)
            .map(String::as_str)
    }

    pub fn rows_in(&self, window: WindowId, container: &str) -> usize {
        self.layout(window)
            .and_then(|layout| {
                layout.elements.iter().find_map(|element| match element {
                    Element::Container { key, rows } if key == container => Some(rows.len()),
                    _ => None,
                })
            })
            .unwrap_or(0)
    }

    fn open_window_mut(&mut self, window: WindowId) -> Option<&mut ScriptedWindow> {
        self.windows.get_mut(&window).filter(|w| w.open)
    }

    fn open_window_or_err(&mut self, window: WindowId) -> Result<&mut ScriptedWindow> {
        self.open_window_mut(window)
            .ok_or_else(|| anyhow!("{window} is not open"))
    }

    /// Apply one action; `None` for silent changes.
    fn apply(&mut self, action: Action) -> Result<Option<WindowEvent>> {
        let (window, event) = match action {
            Action::Raw(event) => return Ok(Some(event)),
            Action::Press { window, key } => (window, Event::Pressed(key)),
            Action::Close { window } => {
                return Ok(Some(WindowEvent {
                    window,
                    event: Event::Closed,
                    values: Values::new(),
                }))
            }
            Action::Toggle { window, key } => {
                let w = self.open_window_or_err(window)?;
                let Some(FieldValue::Checked(checked)) = w.values.get(&key).cloned() else {
                    bail!("no checkbox '{key}' in {window}");
                };
                w.values.insert(key, FieldValue::Checked(!checked));
                return Ok(None);
            }
            Action::Type { window, key, ch } => {
                let w = self.open_window_or_err(window)?;
                let mut text = w.input_text(&key)?;
                text.push(ch);
                w.values.insert(key.clone(), FieldValue::Text(text));
                if !w.emitting.contains(&key) {
                    return Ok(None);
                }
                (window, Event::Changed(key))
            }
            Action::SetText { window, key, text } => {
                let w = self.open_window_or_err(window)?;
                w.input_text(&key)?;
                w.values.insert(key.clone(), FieldValue::Text(text));
                if !w.emitting.contains(&key) {
                    return Ok(None);
                }
                (window, Event::Changed(key))
            }
        };

        let values = self
            .open_window_mut(window)
            .map(|w| w.values.clone())
            .unwrap_or_default();
        Ok(Some(WindowEvent {
            window,
            event,
            values,
        }))
    }
}

impl Toolkit for ScriptedToolkit {
    fn create(&mut self, layout: &Layout) -> Result<WindowId> {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(id, ScriptedWindow::new(layout));
        Ok(id)
    }

    fn poll(&mut self) -> Result<WindowEvent> {
        loop {
            let action = self
                .script
                .pop_front()
                .ok_or_else(|| anyhow!("script exhausted with {} window(s) open", self.open_count()))?;
            if let Some(event) = self.apply(action)? {
                return Ok(event);
            }
        }
    }

    fn update(&mut self, window: WindowId, key: &str, value: FieldValue) -> Result<()> {
        let w = self.open_window_or_err(window)?;
        if w.values.contains(key) {
            w.values.insert(key, value);
        } else if let Some(text) = w.texts.get_mut(key) {
            *text = value.to_string();
        } else {
            bail!("no widget '{key}' in {window}");
        }
        Ok(())
    }

    fn extend(&mut self, window: WindowId, container: &str, rows: Vec<Row>) -> Result<()> {
        let w = self.open_window_or_err(window)?;
        let target = w.layout.elements.iter_mut().find_map(|element| match element {
            Element::Container { key, rows } if key == container => Some(rows),
            _ => None,
        });
        let Some(target) = target else {
            bail!("no container '{container}' in {window}");
        };
        target.extend(rows.iter().cloned());
        for widget in rows.iter().flatten() {
            w.register(widget);
        }
        Ok(())
    }

    fn highlight(&mut self, window: WindowId, key: &str, error: Option<&str>) -> Result<()> {
        let w = self.open_window_or_err(window)?;
        match error {
            Some(message) => {
                w.highlights.insert(key.to_string(), message.to_string());
            }
            None => {
                w.highlights.remove(key);
            }
        }
        Ok(())
    }

    fn close(&mut self, window: WindowId) -> Result<()> {
        if let Some(w) = self.windows.get_mut(&window) {
            w.open = false;
        }
        Ok(())
    }

    fn open_file_dialog(&mut self) -> Result<Option<PathBuf>> {
        self.dialogs_opened += 1;
        Ok(self.dialog_answers.pop_front().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Layout {
        Layout::new("t")
            .row(vec![Widget::Input {
                key: "-live-".into(),
                text: String::new(),
                events: true,
            }])
            .row(vec![
                Widget::Input {
                    key: "-quiet-".into(),
                    text: "x".into(),
                    events: false,
                },
                Widget::Checkbox {
                    key: "-flag-".into(),
                    checked: false,
                },
            ])
            .container("-ROWS-", vec![])
    }

    #[test]
    fn silent_changes_show_up_in_the_next_snapshot() {
        let mut toolkit = ScriptedToolkit::new();
        let w = toolkit.create(&form()).unwrap();
        toolkit
            .type_text(w, "-quiet-", "y")
            .toggle(w, "-flag-")
            .type_text(w, "-live-", "ab");

        let first = toolkit.poll().unwrap();
        assert_eq!(first.event, Event::Changed("-live-".into()));
        assert_eq!(first.values.text("-live-"), Some("a"));
        assert_eq!(first.values.text("-quiet-"), Some("xy"));
        assert_eq!(first.values.get("-flag-"), Some(&FieldValue::Checked(true)));
        assert_eq!(toolkit.poll().unwrap().values.text("-live-"), Some("ab"));
        assert!(toolkit.poll().is_err());
    }

    #[test]
    fn extend_registers_new_inputs() {
        let mut toolkit = ScriptedToolkit::new();
        let w = toolkit.create(&form()).unwrap();
        toolkit
            .extend(
                w,
                "-ROWS-",
                vec![vec![Widget::Input {
                    key: "-ROW-0-".into(),
                    text: String::new(),
                    events: true,
                }]],
            )
            .unwrap();
        assert_eq!(toolkit.rows_in(w, "-ROWS-"), 1);
        assert_eq!(toolkit.text(w, "-ROW-0-").as_deref(), Some(""));
        assert!(toolkit.extend(w, "-NOPE-", vec![]).is_err());
    }

    #[test]
    fn closed_windows_still_deliver_queued_events() {
        let mut toolkit = ScriptedToolkit::new();
        let w = toolkit.create(&form()).unwrap();
        toolkit.press(w, "-go-");
        toolkit.close(w).unwrap();
        let event = toolkit.poll().unwrap();
        assert_eq!(event.window, w);
        assert!(event.values.is_empty());
        assert!(toolkit.update(w, "-live-", FieldValue::Text("z".into())).is_err());
    }
}
