//! Full-screen states shown around a test: loading, failure, nothing found.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.title().to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Loading questions...".fg(Color::Yellow)),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    render_panel(frame, area, content, 8);
}

pub fn render_failed(frame: &mut Frame, area: Rect, message: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "COULD NOT LOAD QUESTIONS",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "r retry  ·  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    render_panel(frame, area, content, 9);
}

pub fn render_empty(frame: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "NO QUESTIONS YET",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(
            format!("Nothing found for {}", app.selector().default_title()).fg(Color::Gray),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "r refresh  ·  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    render_panel(frame, area, content, 8);
}

fn render_panel(frame: &mut Frame, area: Rect, content: Vec<Line>, height: u16) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .horizontal_margin(4)
    .split(area);

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);
}
