//! One form window: widget state, keyboard focus and line rendering.
//!
//! Keys:
//! - `Tab` / `Down`, `BackTab` / `Up`: move focus
//! - `Enter` / `Space`: press a button, toggle a checkbox
//! - `Enter` in an input: focus the next widget
//! - inputs that report changes keep the cursor at the end of their text
//! - `Esc`: close the window
//! - anything else edits the focused input

use std::collections::HashMap;

use anyhow::{bail, Result};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use guinputs::layout::{Element, Layout, Row, Widget};
use guinputs::toolkit::{Event, FieldValue, Values};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tui_input::{backend::crossterm::EventHandler, Input};

const INPUT_WIDTH: usize = 24;
const CELL_GAP: &str = "  ";

#[derive(Debug, Clone)]
enum Cell {
    Label(String),
    Text { key: String, text: String },
    Input { key: String, input: Input, events: bool },
    Checkbox { key: String, checked: bool },
    Button { key: String, label: String },
}

impl Cell {
    fn from_widget(widget: &Widget) -> Self {
        match widget {
            Widget::Label(text) => Cell::Label(text.clone()),
            Widget::Text { key, text } => Cell::Text {
                key: key.clone(),
                text: text.clone(),
            },
            Widget::Input { key, text, events } => Cell::Input {
                key: key.clone(),
                input: Input::new(text.clone()),
                events: *events,
            },
            Widget::Checkbox { key, checked } => Cell::Checkbox {
                key: key.clone(),
                checked: *checked,
            },
            Widget::Button { key, label } => Cell::Button {
                key: key.clone(),
                label: label.clone(),
            },
        }
    }

    fn key(&self) -> Option<&str> {
        match self {
            Cell::Label(_) => None,
            Cell::Text { key, .. }
            | Cell::Input { key, .. }
            | Cell::Checkbox { key, .. }
            | Cell::Button { key, .. } => Some(key),
        }
    }

    fn is_focusable(&self) -> bool {
        matches!(
            self,
            Cell::Input { .. } | Cell::Checkbox { .. } | Cell::Button { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct Section {
    container: Option<String>,
    rows: Vec<Vec<Cell>>,
}

fn convert_rows(rows: &[Row]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|row| row.iter().map(Cell::from_widget).collect())
        .collect()
}

#[derive(Debug, Clone)]
pub struct TerminalWindow {
    title: String,
    sections: Vec<Section>,
    focus: usize,
    errors: HashMap<String, String>,
}

impl TerminalWindow {
    pub fn new(layout: &Layout) -> Self {
        let sections = layout
            .elements
            .iter()
            .map(|element| match element {
                Element::Row(row) => Section {
                    container: None,
                    rows: convert_rows(std::slice::from_ref(row)),
                },
                Element::Container { key, rows } => Section {
                    container: Some(key.clone()),
                    rows: convert_rows(rows),
                },
            })
            .collect();
        Self {
            title: layout.title.clone(),
            sections,
            focus: 0,
            errors: HashMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.sections.iter().flat_map(|s| s.rows.iter().flatten())
    }

    fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.rows.iter_mut().flatten())
    }

    fn focusable_count(&self) -> usize {
        self.cells().filter(|c| c.is_focusable()).count()
    }

    fn focused(&self) -> Option<&Cell> {
        self.cells().filter(|c| c.is_focusable()).nth(self.focus)
    }

    fn focused_mut(&mut self) -> Option<&mut Cell> {
        let focus = self.focus;
        self.cells_mut().filter(|c| c.is_focusable()).nth(focus)
    }

    /// Key of the focused widget.
    pub fn focused_key(&self) -> Option<&str> {
        self.focused().and_then(Cell::key)
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.focusable_count();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }

    /// Apply a key press; returns the event it produced, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Event> {
        match key.code {
            KeyCode::Esc => return Some(Event::Closed),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Event::Closed)
            }
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return None;
            }
            KeyCode::Enter if matches!(self.focused(), Some(Cell::Input { .. })) => {
                self.move_focus(true);
                return None;
            }
            _ => {}
        }

        let activate = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match self.focused_mut()? {
            Cell::Button { key, .. } if activate => Some(Event::Pressed(key.clone())),
            Cell::Checkbox { checked, .. } if activate => {
                *checked = !*checked;
                None
            }
            Cell::Input {
                key: field,
                input,
                events,
            } => {
                let before = input.value().to_string();
                input.handle_event(&CrosstermEvent::Key(key));
                if !*events {
                    return None;
                }
                // Live-filtered inputs only ever edit at the end of the text.
                *input = Input::new(input.value().to_string());
                (input.value() != before).then(|| Event::Changed(field.clone()))
            }
            _ => None,
        }
    }

    /// Snapshot of all inputs and checkboxes.
    pub fn values(&self) -> Values {
        self.cells()
            .filter_map(|cell| match cell {
                Cell::Input { key, input, .. } => {
                    Some((key.clone(), FieldValue::Text(input.value().to_string())))
                }
                Cell::Checkbox { key, checked } => Some((key.clone(), FieldValue::Checked(*checked))),
                _ => None,
            })
            .collect()
    }

    pub fn update(&mut self, key: &str, value: FieldValue) -> Result<()> {
        let Some(cell) = self.cells_mut().find(|c| c.key() == Some(key)) else {
            bail!("no widget '{key}'");
        };
        match (cell, value) {
            (Cell::Input { input, .. }, value) => *input = Input::new(value.to_string()),
            (Cell::Checkbox { checked, .. }, FieldValue::Checked(b)) => *checked = b,
            (Cell::Text { text, .. }, value) => *text = value.to_string(),
            (_, value) => bail!("widget '{key}' cannot show '{value}'"),
        }
        Ok(())
    }

    pub fn extend(&mut self, container: &str, rows: &[Row]) -> Result<()> {
        let Some(section) = self
            .sections
            .iter_mut()
            .find(|s| s.container.as_deref() == Some(container))
        else {
            bail!("no container '{container}'");
        };
        section.rows.extend(convert_rows(rows));
        Ok(())
    }

    pub fn highlight(&mut self, key: &str, error: Option<&str>) {
        match error {
            Some(message) => {
                self.errors.insert(key.to_string(), message.to_string());
            }
            None => {
                self.errors.remove(key);
            }
        }
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Rendered lines plus the cursor position (column, line) of the focused input.
    pub fn lines(&self) -> (Vec<Line<'static>>, Option<(u16, u16)>) {
        let mut lines = Vec::new();
        let mut cursor = None;
        let mut focus_index = 0;

        for row in self.sections.iter().flat_map(|s| s.rows.iter()) {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut messages = Vec::new();

            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(CELL_GAP));
                }
                let focused = cell.is_focusable() && focus_index == self.focus;
                if cell.is_focusable() {
                    focus_index += 1;
                }
                let error = cell.key().and_then(|k| self.errors.get(k));
                if let Some(message) = error {
                    messages.push(message.clone());
                }

                if let (true, Cell::Input { input, .. }) = (focused, cell) {
                    let offset: usize = spans.iter().map(Span::width).sum();
                    let col = offset + 1 + input.visual_cursor();
                    cursor = Some((col as u16, lines.len() as u16));
                }
                spans.push(render_cell(cell, focused, error.is_some()));
            }

            lines.push(Line::from(spans));
            for message in messages {
                lines.push(Line::from(Span::styled(
                    format!("  ! {message}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        (lines, cursor)
    }
}

fn render_cell(cell: &Cell, focused: bool, invalid: bool) -> Span<'static> {
    let mut style = match cell {
        Cell::Label(_) => Style::default().add_modifier(Modifier::BOLD),
        Cell::Text { .. } => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::White),
    };
    if invalid {
        style = style.fg(Color::Red);
    }
    if focused {
        style = style.fg(Color::Black).bg(if invalid { Color::Red } else { Color::White });
    }

    let text = match cell {
        Cell::Label(text) => format!("{text}:"),
        Cell::Text { text, .. } if text.is_empty() => "(none)".to_string(),
        Cell::Text { text, .. } => text.clone(),
        Cell::Input { input, .. } => {
            let value = input.value();
            let width = INPUT_WIDTH.max(value.chars().count() + 1);
            format!("[{value:<width$}]")
        }
        Cell::Checkbox { checked: true, .. } => "[x]".to_string(),
        Cell::Checkbox { checked: false, .. } => "[ ]".to_string(),
        Cell::Button { label, .. } => format!("< {label} >"),
    };
    Span::styled(text, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guinputs::types::NumericKind;
    use guinputs::validate::filter;
    use pretty_assertions::assert_eq;

    fn layout() -> Layout {
        Layout::new("form")
            .row(vec![
                Widget::Label("times".into()),
                Widget::Input {
                    key: "-times-INT-".into(),
                    text: "1".into(),
                    events: true,
                },
            ])
            .row(vec![
                Widget::Label("loud".into()),
                Widget::Checkbox {
                    key: "-loud-BOOL-".into(),
                    checked: false,
                },
            ])
            .container("-ROWS-", vec![])
            .row(vec![Widget::Button {
                key: "-SUBMIT-".into(),
                label: "Submit".into(),
            }])
    }

    fn press(window: &mut TerminalWindow, code: KeyCode) -> Option<Event> {
        window.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_emits_changes_with_new_text() {
        let mut window = TerminalWindow::new(&layout());
        assert_eq!(
            press(&mut window, KeyCode::Char('2')),
            Some(Event::Changed("-times-INT-".into()))
        );
        assert_eq!(
            window.values().text("-times-INT-"),
            Some("12")
        );
        // cursor movement alone changes nothing
        assert_eq!(press(&mut window, KeyCode::Left), None);
    }

    #[test]
    fn reporting_inputs_edit_at_the_end_only() {
        let mut window = TerminalWindow::new(&layout());
        press(&mut window, KeyCode::Char('2'));
        assert_eq!(press(&mut window, KeyCode::Home), None);
        assert_eq!(
            press(&mut window, KeyCode::Char('a')),
            Some(Event::Changed("-times-INT-".into()))
        );
        let typed = window.values().text("-times-INT-").unwrap().to_string();
        assert_eq!(typed, "12a");
        assert_eq!(filter(NumericKind::Integer, &typed).resolve(&typed), "12");
    }

    #[test]
    fn focus_moves_to_checkbox_and_button() {
        let mut window = TerminalWindow::new(&layout());
        press(&mut window, KeyCode::Tab);
        assert_eq!(window.focused_key(), Some("-loud-BOOL-"));
        assert_eq!(press(&mut window, KeyCode::Char(' ')), None);
        assert_eq!(
            window.values().get("-loud-BOOL-"),
            Some(&FieldValue::Checked(true))
        );

        press(&mut window, KeyCode::Down);
        assert_eq!(
            press(&mut window, KeyCode::Enter),
            Some(Event::Pressed("-SUBMIT-".into()))
        );
        press(&mut window, KeyCode::Tab);
        assert_eq!(window.focused_key(), Some("-times-INT-"));
        assert_eq!(press(&mut window, KeyCode::Esc), Some(Event::Closed));
    }

    #[test]
    fn update_extend_and_highlight() {
        let mut window = TerminalWindow::new(&layout());
        window
            .update("-times-INT-", FieldValue::Text("7".into()))
            .unwrap();
        assert_eq!(window.values().text("-times-INT-"), Some("7"));
        assert!(window.update("-nope-", FieldValue::Text("x".into())).is_err());

        window
            .extend(
                "-ROWS-",
                &[vec![Widget::Input {
                    key: "-ROW-0-".into(),
                    text: String::new(),
                    events: true,
                }]],
            )
            .unwrap();
        assert!(window.values().contains("-ROW-0-"));
        assert!(window.extend("-MISSING-", &[]).is_err());

        window.highlight("-times-INT-", Some("'x' is not a valid integer"));
        let (lines, cursor) = window.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(cursor, Some(("times:".len() as u16 + 2 + 1 + 1, 0)));
        window.highlight("-times-INT-", None);
        assert_eq!(window.error("-times-INT-"), None);
    }
}
