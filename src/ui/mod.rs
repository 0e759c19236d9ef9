//! UI rendering.
//!
//! Stateless rendering of the current state store: a course-selection
//! screen, then the study screen with chapters, topics, the four-tab
//! content pane, the tutor chat and a status line. Nothing here mutates
//! state; handlers do.

mod chat;
mod content;
mod course_select;
mod panels;
pub mod theme;

pub use theme::{Theme, ThemeMode};

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Focus, Screen};
use crate::traits::HttpClient;

/// Spinner frames advanced by the app tick.
pub(crate) const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current spinner frame for this tick.
pub(crate) fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick / 2) as usize % SPINNER.len()]
}

/// Render the UI based on the current screen.
pub fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>) {
    let theme = Theme::for_mode(app.theme);
    match app.screen {
        Screen::CourseSelect => course_select::render(frame, app, &theme),
        Screen::Study => render_study(frame, app, &theme),
    }
}

/// Study screen: chapters/topics on the left, content and chat on the
/// right, status line at the bottom.
fn render_study<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    panels::render_chapters(frame, app, theme, left[0]);
    panels::render_topics(frame, app, theme, left[1]);
    content::render(frame, app, theme, right[0]);
    chat::render(frame, app, theme, right[1]);
    render_status_line(frame, app, theme, rows[1]);
}

/// Bottom status line: global error or keybind hints.
fn render_status_line<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let line = if let Some(error) = &app.global_error {
        Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(theme.error),
        ))
    } else {
        let course = format!(
            " {} · {} ",
            app.state.selection.subject, app.state.selection.standard
        );
        Line::from(vec![
            Span::styled(course, Style::default().fg(theme.accent)),
            Span::styled(
                "Tab focus · a answer · i image · z quiz · e simpler · s speak · m more topics · t theme · R reset · q quit",
                Style::default().fg(theme.dim),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Style for a pane border depending on focus.
pub(crate) fn border_style(theme: &Theme, focused: bool) -> Style {
    if focused {
        Style::default().fg(theme.border_focused)
    } else {
        Style::default().fg(theme.border)
    }
}

/// Whether the given pane is focused.
pub(crate) fn is_focused<C: HttpClient + 'static>(app: &App<C>, pane: Focus) -> bool {
    app.focus == pane
}
