use guinputs::toolkit::WindowId;
use indexmap::IndexMap;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::dialog::PathPrompt;
use crate::popup::{centered_rect_fixed, draw_popup_frame, inner_rect, render_backdrop};
use crate::window::TerminalWindow;

const MIN_WINDOW_WIDTH: u16 = 40;

/// Draw the window bar, the active window and an optional file prompt.
pub fn draw(
    frame: &mut Frame<'_>,
    windows: &IndexMap<WindowId, TerminalWindow>,
    active: Option<WindowId>,
    prompt: Option<&PathPrompt>,
) {
    let area = frame.area();
    render_backdrop(frame, area);
    if area.height < 3 {
        return;
    }

    let bar: Vec<Span> = windows
        .iter()
        .flat_map(|(id, window)| {
            let style = if Some(*id) == active {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", window.title()), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(bar)), Rect { height: 1, ..area });

    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::White)),
        Span::raw(": next   "),
        Span::styled("Enter", Style::default().fg(Color::White)),
        Span::raw(": press   "),
        Span::styled("Esc", Style::default().fg(Color::White)),
        Span::raw(": close   "),
        Span::styled("F2", Style::default().fg(Color::White)),
        Span::raw(": switch window"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    let footer = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    frame.render_widget(Paragraph::new(hints), footer);

    let body = Rect {
        y: area.y + 1,
        height: area.height - 2,
        ..area
    };
    if let Some(window) = active.and_then(|id| windows.get(&id)) {
        draw_window(frame, body, window);
    }

    if let Some(prompt) = prompt {
        prompt.draw(frame, body);
    }
}

fn draw_window(frame: &mut Frame<'_>, area: Rect, window: &TerminalWindow) {
    let (lines, cursor) = window.lines();
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = content_width.saturating_add(4).max(MIN_WINDOW_WIDTH);
    let height = (lines.len() as u16).saturating_add(2);

    let dialog = centered_rect_fixed(area, width, height);
    draw_popup_frame(frame, dialog, window.title());
    let inner = inner_rect(dialog);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // keep the cursor line in view
    let scroll = cursor
        .map(|(_, line)| line.saturating_sub(inner.height - 1))
        .unwrap_or(0);
    let body = Paragraph::new(lines).scroll((scroll, 0));
    frame.render_widget(body, inner);

    if let Some((col, line)) = cursor {
        let col = col.min(inner.width - 1);
        frame.set_cursor_position((inner.x + col, inner.y + line - scroll));
    }
}
