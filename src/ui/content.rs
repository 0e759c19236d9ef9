//! Content pane: the four tabs of the selected topic.

use base64::Engine;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Focus};
use crate::state::{ActiveView, Mcq, Slot};
use crate::traits::HttpClient;

use super::{border_style, is_focused, spinner_frame, Theme};

const TABS: &[(ActiveView, &str)] = &[
    (ActiveView::Answer, "Answer"),
    (ActiveView::Image, "Image"),
    (ActiveView::Quiz, "Quiz"),
    (ActiveView::Eli5, "ELI5"),
];

pub(super) fn render<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    area: Rect,
) {
    let Some(topic) = app.state.selected_topic.as_deref() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Content ")
            .border_style(border_style(theme, is_focused(app, Focus::Content)));
        let hint = Paragraph::new("Select a topic to study it.")
            .style(Style::default().fg(theme.dim))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let content = app.state.content_for(topic);
    let active = content.map(|c| c.active_view).unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", topic))
        .border_style(border_style(theme, is_focused(app, Focus::Content)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    render_tab_bar(frame, theme, active, rows[0]);

    let Some(content) = content else {
        return;
    };

    match active {
        ActiveView::Answer => {
            render_text_slot(frame, app, theme, &content.answer, "a", "explanation", rows[1])
        }
        ActiveView::Eli5 => {
            render_text_slot(frame, app, theme, &content.eli5, "e", "simpler explanation", rows[1])
        }
        ActiveView::Image => render_image_slot(frame, app, theme, &content.image, rows[1]),
        ActiveView::Quiz => render_quiz_slot(frame, app, theme, &content.mcqs, rows[1]),
    }
}

fn render_tab_bar(frame: &mut Frame, theme: &Theme, active: ActiveView, area: Rect) {
    let mut spans = Vec::new();
    for (view, label) in TABS {
        let style = if *view == active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_text_slot<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    slot: &Slot<String>,
    key: &str,
    noun: &str,
    area: Rect,
) {
    let paragraph = if slot.is_loading {
        Paragraph::new(format!(
            "{} generating {}...",
            spinner_frame(app.tick_count),
            noun
        ))
        .style(Style::default().fg(theme.loading))
    } else if let Some(text) = &slot.data {
        Paragraph::new(text.as_str())
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: false })
    } else if let Some(error) = &slot.error {
        Paragraph::new(error.as_str())
            .style(Style::default().fg(theme.error))
            .wrap(Wrap { trim: false })
    } else {
        Paragraph::new(format!("Press '{}' to generate the {}.", key, noun))
            .style(Style::default().fg(theme.dim))
    };
    frame.render_widget(paragraph, area);
}

fn render_image_slot<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    slot: &Slot<String>,
    area: Rect,
) {
    let paragraph = if slot.is_loading {
        Paragraph::new(format!(
            "{} generating illustration...",
            spinner_frame(app.tick_count)
        ))
        .style(Style::default().fg(theme.loading))
    } else if let Some(b64) = &slot.data {
        Paragraph::new(describe_image(b64))
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: false })
    } else if let Some(error) = &slot.error {
        Paragraph::new(error.as_str())
            .style(Style::default().fg(theme.error))
            .wrap(Wrap { trim: false })
    } else {
        Paragraph::new("Press 'i' to generate an illustration.")
            .style(Style::default().fg(theme.dim))
    };
    frame.render_widget(paragraph, area);
}

/// Describe a cached base64 image. Terminals cannot show the bitmap
/// directly, so report its decoded format and dimensions.
fn describe_image(b64: &str) -> String {
    let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(b64) else {
        return "Image cached (undecodable payload).".to_string();
    };
    match image::load_from_memory(&bytes) {
        Ok(img) => format!(
            "Illustration ready: {}×{} px, {} KB decoded.\nExport it from the data directory to view.",
            img.width(),
            img.height(),
            bytes.len() / 1024
        ),
        Err(_) => format!("Image cached ({} KB, unrecognized format).", bytes.len() / 1024),
    }
}

fn render_quiz_slot<C: HttpClient + 'static>(
    frame: &mut Frame,
    app: &App<C>,
    theme: &Theme,
    slot: &Slot<Vec<Mcq>>,
    area: Rect,
) {
    if slot.is_loading {
        let paragraph = Paragraph::new(format!(
            "{} generating quiz...",
            spinner_frame(app.tick_count)
        ))
        .style(Style::default().fg(theme.loading));
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(mcqs) = &slot.data else {
        let paragraph = if let Some(error) = &slot.error {
            Paragraph::new(error.as_str())
                .style(Style::default().fg(theme.error))
                .wrap(Wrap { trim: false })
        } else {
            Paragraph::new("Press 'z' to generate a quiz.").style(Style::default().fg(theme.dim))
        };
        frame.render_widget(paragraph, area);
        return;
    };

    let index = app.quiz_cursor.min(mcqs.len().saturating_sub(1));
    let Some(mcq) = mcqs.get(index) else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Question {}/{}", index + 1, mcqs.len()),
            Style::default().fg(theme.dim),
        )),
        Line::from(Span::styled(
            mcq.question.clone(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, option) in mcq.options.iter().enumerate() {
        let is_correct = app.quiz_revealed && *option == mcq.correct_answer;
        let style = if is_correct {
            Style::default()
                .fg(theme.user)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let prefix = (b'A' + i as u8) as char;
        lines.push(Line::from(Span::styled(
            format!("  {}. {}", prefix, option),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if app.quiz_revealed {
            "←/→ other questions"
        } else {
            "Enter reveal · ←/→ other questions"
        },
        Style::default().fg(theme.dim),
    )));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_image_rejects_garbage() {
        assert!(describe_image("!!not-base64!!").contains("undecodable"));
    }

    #[test]
    fn test_describe_image_unknown_format() {
        let b64 = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3, 4]);
        assert!(describe_image(&b64).contains("unrecognized format"));
    }
}
