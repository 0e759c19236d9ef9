//! Course-selection screen: pick a subject, then a standard.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, CourseStage};
use crate::catalog;
use crate::traits::HttpClient;

use super::Theme;

pub(super) fn render<C: HttpClient + 'static>(frame: &mut Frame, app: &App<C>, theme: &Theme) {
    let area = centered(frame.area(), 44, 16);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let title = match app.course_stage {
        CourseStage::Subject => "Choose a subject",
        CourseStage::Standard => "Choose a class",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );

    let (items, cursor): (Vec<String>, usize) = match app.course_stage {
        CourseStage::Subject => (
            catalog::subjects().iter().map(|s| s.to_string()).collect(),
            app.subject_cursor,
        ),
        CourseStage::Standard => {
            let subject = catalog::subjects()
                .get(app.subject_cursor)
                .copied()
                .unwrap_or_default();
            (
                catalog::standards_for(subject)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                app.standard_cursor,
            )
        }
    };

    let list = List::new(items.into_iter().map(ListItem::new).collect::<Vec<_>>())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().fg(theme.text))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(cursor));
    frame.render_stateful_widget(list, rows[1], &mut state);
}

/// Center a fixed-size box inside `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        let rect = centered(area, 44, 16);
        assert!(rect.width <= 10);
        assert!(rect.height <= 5);
    }

    #[test]
    fn test_centered_centers() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered(area, 40, 10);
        assert_eq!(rect.x, 30);
        assert_eq!(rect.y, 15);
    }
}
