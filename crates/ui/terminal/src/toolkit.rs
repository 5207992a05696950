use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guinputs::layout::{Layout, Row};
use guinputs::toolkit::{FieldValue, Toolkit, WindowEvent, WindowId};
use indexmap::IndexMap;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, trace};

use crate::config::TerminalConfig;
use crate::dialog::{PathPrompt, PromptOutcome};
use crate::render;
use crate::window::TerminalWindow;

type Backend = CrosstermBackend<Stdout>;

/// Leave the alternate screen and raw mode.
///
/// Safe to call when the terminal was never entered.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// [`Toolkit`] drawing every window as a popup in the terminal.
///
/// The terminal switches to the alternate screen when the first window is
/// created and back when the last one closes. Only the active window (the
/// most recently opened, or the one picked with F2) receives keys.
pub struct TerminalToolkit {
    config: TerminalConfig,
    terminal: Option<Terminal<Backend>>,
    windows: IndexMap<WindowId, TerminalWindow>,
    active: Option<WindowId>,
    next_id: u64,
}

impl TerminalToolkit {
    pub fn new(config: TerminalConfig) -> Self {
        Self {
            config,
            terminal: None,
            windows: IndexMap::new(),
            active: None,
            next_id: 0,
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            return Ok(());
        }
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        self.terminal = Some(Terminal::new(CrosstermBackend::new(stdout))?);
        debug!("entered alternate screen");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            restore()?;
            terminal.show_cursor()?;
            debug!("left alternate screen");
        }
        Ok(())
    }

    fn draw(&mut self, prompt: Option<&PathPrompt>) -> Result<()> {
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(());
        };
        let windows = &self.windows;
        let active = self.active;
        terminal.draw(|frame| render::draw(frame, windows, active, prompt))?;
        Ok(())
    }

    fn window_mut(&mut self, window: WindowId) -> Result<&mut TerminalWindow> {
        self.windows
            .get_mut(&window)
            .ok_or_else(|| anyhow!("{window} is not open"))
    }

    /// Activate the next window in creation order.
    fn cycle(&mut self) {
        let Some(active) = self.active else { return };
        let Some(index) = self.windows.get_index_of(&active) else { return };
        let next = (index + 1) % self.windows.len();
        self.active = self.windows.get_index(next).map(|(id, _)| *id);
    }
}

impl Toolkit for TerminalToolkit {
    fn create(&mut self, layout: &Layout) -> Result<WindowId> {
        self.enter()?;
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(id, TerminalWindow::new(layout));
        self.active = Some(id);
        Ok(id)
    }

    fn poll(&mut self) -> Result<WindowEvent> {
        loop {
            self.draw(None)?;
            let Some(active) = self.active else {
                bail!("no open window to poll");
            };
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::F(2) {
                self.cycle();
                continue;
            }

            let window = self.window_mut(active)?;
            if let Some(event) = window.handle_key(key) {
                trace!(window = %active, ?event, "terminal event");
                return Ok(WindowEvent {
                    window: active,
                    event,
                    values: window.values(),
                });
            }
        }
    }

    fn update(&mut self, window: WindowId, key: &str, value: FieldValue) -> Result<()> {
        self.window_mut(window)?.update(key, value)
    }

    fn extend(&mut self, window: WindowId, container: &str, rows: Vec<Row>) -> Result<()> {
        self.window_mut(window)?.extend(container, &rows)
    }

    fn highlight(&mut self, window: WindowId, key: &str, error: Option<&str>) -> Result<()> {
        self.window_mut(window)?.highlight(key, error);
        Ok(())
    }

    fn close(&mut self, window: WindowId) -> Result<()> {
        self.windows.shift_remove(&window);
        if self.active == Some(window) {
            self.active = self.windows.last().map(|(id, _)| *id);
        }
        if self.windows.is_empty() {
            self.leave()?;
        }
        Ok(())
    }

    fn open_file_dialog(&mut self) -> Result<Option<PathBuf>> {
        let mut prompt = PathPrompt::new(&self.config);
        loop {
            self.draw(Some(&prompt))?;
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match prompt.handle_key(key) {
                Some(PromptOutcome::Chosen(path)) => return Ok(Some(path)),
                Some(PromptOutcome::Cancelled) => return Ok(None),
                None => {}
            }
        }
    }
}

impl Drop for TerminalToolkit {
    fn drop(&mut self) {
        if self.terminal.is_some() {
            let _ = restore();
        }
    }
}
