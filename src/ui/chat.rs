//! Tutor chat pane: transcript plus the input line.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};
use crate::state::ChatRole;
use crate::traits::HttpClient;

use super::{border_style, is_focused, spinner_frame, Theme};

pub(super) fn render<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tutor ")
        .border_style(border_style(theme, is_focused(app, Focus::Chat)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_transcript(frame, app, theme, rows[0]);
    render_input(frame, app, theme, rows[1]);
}

fn render_transcript<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let mut lines: Vec<Line> = Vec::new();
    for entry in &app.transcript {
        let (label, color) = match entry.role {
            ChatRole::User => ("you", theme.user),
            ChatRole::Model => ("tutor", theme.model),
        };
        lines.push(Line::from(Span::styled(
            format!("{}:", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for text_line in entry.text.lines() {
            lines.push(Line::from(Span::styled(
                text_line.to_string(),
                Style::default().fg(theme.text),
            )));
        }
    }
    if app.chat_streaming {
        lines.push(Line::from(Span::styled(
            spinner_frame(app.tick_count).to_string(),
            Style::default().fg(theme.loading),
        )));
    }

    // Pin the newest lines into view.
    let visible = area.height as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

fn render_input<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let focused = is_focused(app, Focus::Chat);
    let (prompt_style, text) = if app.chat_input.is_empty() && !focused {
        (
            Style::default().fg(theme.dim),
            "press 'c' to ask the tutor".to_string(),
        )
    } else {
        (Style::default().fg(theme.text), app.chat_input.clone())
    };

    let cursor = if focused { "█" } else { "" };
    let line = Line::from(vec![
        Span::styled("❯ ", Style::default().fg(theme.accent)),
        Span::styled(text.clone(), prompt_style),
        Span::styled(cursor, Style::default().fg(theme.accent)),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if focused {
        let x = area.x + 2 + text.width() as u16;
        if x < area.x + area.width {
            frame.set_cursor_position((x, area.y));
        }
    }
}
