use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Question, Sentiment};
use crate::session::SessionController;
use crate::timer::{CountdownTimer, Urgency};

use super::{centered, option_label};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };
    let question = session.current_question();
    let has_context = question.context.is_some();

    let chunks = create_layout(area, has_context);

    render_header(frame, chunks[0], app, session);
    render_time_gauge(frame, chunks[1], app.timer());
    render_prompt(frame, chunks[2], &question.prompt);

    let options_chunk = if let Some(context) = &question.context {
        render_context(frame, chunks[3], context);
        chunks[4]
    } else {
        chunks[3]
    };

    render_options(
        frame,
        options_chunk,
        question,
        session.current_answer().selected,
        app.cursor(),
    );

    let status_chunk = if has_context { chunks[5] } else { chunks[4] };
    render_status(frame, status_chunk, app, session);

    let controls_chunk = if has_context { chunks[6] } else { chunks[5] };
    render_controls(frame, controls_chunk);

    if app.is_paused() {
        render_paused(frame, area);
    } else if app.is_confirming_submit() {
        render_confirm(frame, area, session);
    }
}

fn create_layout(area: Rect, has_context: bool) -> std::rc::Rc<[Rect]> {
    if has_context {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(area)
    } else {
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(2)
        .split(area)
    }
}

fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Normal => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::Critical => Color::Red,
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, session: &SessionController) {
    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(28)]).split(area);

    let title = Paragraph::new(app.title()).fg(Color::Cyan).bold();
    frame.render_widget(title, columns[0]);

    let progress = format!(
        "{}/{}  ·  {} answered  ",
        session.current_index() + 1,
        session.total_questions(),
        session.answered_count()
    );
    let timer = app.timer();
    let line = Line::from(vec![
        Span::styled(progress, Style::default().fg(Color::DarkGray)),
        Span::styled(
            timer.display(),
            Style::default().fg(urgency_color(timer.urgency())).bold(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), columns[1]);
}

fn render_time_gauge(frame: &mut Frame, area: Rect, timer: &CountdownTimer) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(urgency_color(timer.urgency())))
        .ratio(timer.fraction_remaining().clamp(0.0, 1.0))
        .label("");
    frame.render_widget(gauge, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_context(frame: &mut Frame, area: Rect, context: &str) {
    let lines: Vec<Line> = context
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::Yellow))))
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: Option<usize>,
    cursor: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_selected = selected == Some(index);

        let style = match (is_selected, is_cursor) {
            (true, _) => Style::default().fg(Color::Green).bold(),
            (false, true) => Style::default().fg(Color::Cyan).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let check = if is_selected { "●" } else { "○" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} {} ", marker, check), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, session: &SessionController) {
    let line = if let Some(notice) = app.notice() {
        Line::from(Span::styled(notice, Style::default().fg(Color::Red)))
    } else {
        match session.current_feedback() {
            Some(Sentiment::Positive) => Line::from("feedback: helpful".fg(Color::Green)),
            Some(Sentiment::Negative) => Line::from("feedback: not helpful".fg(Color::Red)),
            None => Line::from(""),
        }
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "j/k move  ·  enter/1-9 answer  ·  h/l prev/next  ·  +/- feedback  ·  p pause  ·  s submit  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 30, 5);
    let content = vec![
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow).bold())),
        Line::from(""),
        Line::from("p to resume".fg(Color::DarkGray)),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::Yellow),
        ),
        popup,
    );
}

fn render_confirm(frame: &mut Frame, area: Rect, session: &SessionController) {
    let unanswered = session.total_questions() - session.answered_count();
    let warning = if unanswered > 0 {
        format!("{} question(s) unanswered will count as wrong", unanswered)
    } else {
        "All questions answered".to_string()
    };

    let popup = centered(area, 52, 7);
    let content = vec![
        Line::from(Span::styled(
            "Submit your answers?",
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(warning, Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from("y submit  ·  n keep going".fg(Color::DarkGray)),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::Cyan),
        ),
        popup,
    );
}
