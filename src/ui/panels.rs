//! Left-column panes: chapter list and topic list.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::app::{App, Focus};
use crate::traits::HttpClient;

use super::{border_style, is_focused, spinner_frame, Theme};

pub(super) fn render_chapters<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let selected = app.state.selected_chapter.as_deref();
    let items: Vec<ListItem> = app
        .chapters()
        .iter()
        .map(|chapter| {
            let marker = if Some(*chapter) == selected { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(*chapter, Style::default().fg(theme.text)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Chapters ")
                .border_style(border_style(theme, is_focused(app, Focus::Chapters))),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(app.chapter_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

pub(super) fn render_topics<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let selected = app.state.selected_topic.as_deref();
    let mut items: Vec<ListItem> = app
        .state
        .current_topics()
        .iter()
        .map(|topic| {
            let marker = if Some(topic.as_str()) == selected {
                "● "
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(topic.clone(), Style::default().fg(theme.text)),
            ]))
        })
        .collect();

    let in_flight = app
        .state
        .selected_chapter
        .as_ref()
        .map(|c| app.topics_in_flight.contains(c))
        .unwrap_or(false);
    if in_flight {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{} generating topics...", spinner_frame(app.tick_count)),
            Style::default().fg(theme.loading),
        ))));
    } else if app
        .state
        .selected_chapter
        .as_ref()
        .and_then(|c| app.state.chapters.get(c))
        .map(|c| c.no_more_topics)
        .unwrap_or(false)
    {
        items.push(ListItem::new(Line::from(Span::styled(
            "  no more topics",
            Style::default().fg(theme.dim),
        ))));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Topics ")
                .border_style(border_style(theme, is_focused(app, Focus::Topics))),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(app.topic_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}
