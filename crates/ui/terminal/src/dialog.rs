use std::path::{Path, PathBuf};

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::config::TerminalConfig;
use crate::popup::{centered_rect_fixed, draw_popup_frame, inner_rect};

type Validator = Box<dyn Fn(&str) -> Result<(), String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Chosen(PathBuf),
    Cancelled,
}

/// Single-line file path prompt standing in for a native file chooser.
///
/// - Enter: submit (empty input cancels)
/// - Esc: cancel
pub struct PathPrompt {
    input: Input,
    error: Option<String>,
    validator: Option<Validator>,
    min_width: u16,
    min_height: u16,
}

impl PathPrompt {
    pub fn new(config: &TerminalConfig) -> Self {
        let validator: Option<Validator> = config.require_existing_file.then(|| {
            Box::new(|raw: &str| {
                if Path::new(raw).is_file() {
                    Ok(())
                } else {
                    Err(format!("no such file: {raw}"))
                }
            }) as Validator
        });
        Self {
            input: Input::new(config.file_dialog_start.clone()),
            error: None,
            validator,
            min_width: 60,
            min_height: 9,
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PromptOutcome> {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Some(PromptOutcome::Cancelled),
            _ => {
                self.input.handle_event(&CrosstermEvent::Key(key));
                self.error = None;
                None
            }
        }
    }

    fn submit(&mut self) -> Option<PromptOutcome> {
        let raw = self.input.value().trim();
        if raw.is_empty() {
            return Some(PromptOutcome::Cancelled);
        }
        if let Some(validate) = &self.validator {
            if let Err(msg) = validate(raw) {
                self.error = Some(msg);
                return None;
            }
        }
        Some(PromptOutcome::Chosen(PathBuf::from(raw)))
    }

    fn input_box_area(inner: Rect) -> Rect {
        let box_height = 3;
        let y = inner.y.saturating_add(2).min(
            inner
                .y
                .saturating_add(inner.height.saturating_sub(box_height)),
        );
        Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: box_height,
        }
    }

    pub fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        if area.width < 5 || area.height < 5 {
            return;
        }

        let dialog = centered_rect_fixed(area, self.min_width, self.min_height);
        draw_popup_frame(f, dialog, "Choose file");
        let inner = inner_rect(dialog);
        f.render_widget(Clear, inner);

        let label = Paragraph::new(Line::from(vec![
            Span::styled("Path", Style::default().bold()),
            Span::raw(":"),
        ]));
        f.render_widget(label, Rect { height: 1, ..inner });

        let input_box_area = Self::input_box_area(inner);
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let input_inner = input_block.inner(input_box_area);
        f.render_widget(input_block, input_box_area);

        let width = input_inner.width as usize;
        let scroll = self.input.visual_scroll(width.saturating_sub(1));
        let value = Paragraph::new(self.input.value()).scroll((0, scroll as u16));
        f.render_widget(value, input_inner);

        if input_inner.width > 0 && input_inner.height > 0 {
            let cursor_col = (self.input.visual_cursor().saturating_sub(scroll) as u16)
                .min(input_inner.width.saturating_sub(1));
            f.set_cursor_position((input_inner.x + cursor_col, input_inner.y));
        }

        if let Some(err) = &self.error {
            let y = input_box_area
                .y
                .saturating_add(input_box_area.height)
                .min(inner.y + inner.height.saturating_sub(1));
            let err_line = Paragraph::new(Text::from(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red),
            )));
            f.render_widget(err_line, Rect { y, height: 1, ..inner });
        }

        let hints_y = inner.y + inner.height.saturating_sub(1);
        if hints_y > inner.y + 1 {
            let hints = Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::White)),
                Span::raw(": Choose   "),
                Span::styled("Esc", Style::default().fg(Color::White)),
                Span::raw(": Cancel"),
            ])
            .fg(Color::DarkGray);
            f.render_widget(Paragraph::new(hints), Rect { y: hints_y, height: 1, ..inner });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(prompt: &mut PathPrompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle_key(key(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn typed_path_is_chosen() {
        let mut prompt = PathPrompt::new(&TerminalConfig::default());
        type_str(&mut prompt, "notes.txt");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            Some(PromptOutcome::Chosen(PathBuf::from("notes.txt")))
        );
    }

    #[test]
    fn empty_input_and_escape_cancel() {
        let mut prompt = PathPrompt::new(&TerminalConfig::default());
        assert_eq!(prompt.handle_key(key(KeyCode::Enter)), Some(PromptOutcome::Cancelled));
        type_str(&mut prompt, "x");
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), Some(PromptOutcome::Cancelled));
    }

    #[test]
    fn missing_file_is_rejected_when_required() {
        let config = TerminalConfig {
            file_dialog_start: "/definitely/not/here".into(),
            require_existing_file: true,
        };
        let mut prompt = PathPrompt::new(&config);
        assert_eq!(prompt.value(), "/definitely/not/here");
        assert_eq!(prompt.handle_key(key(KeyCode::Enter)), None);
        assert!(prompt.error().is_some());

        prompt.handle_key(key(KeyCode::Backspace));
        assert_eq!(prompt.error(), None);
    }
}
