use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::history::DashboardStats;
use crate::models::{Answer, Question};
use crate::session::SessionResult;
use crate::timer::format_clock;

use super::option_label;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(result), Some(session)) = (app.result(), app.session()) else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Length(2),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], result);
    render_question_breakdown(frame, chunks[1], result, session.questions(), app.result_scroll());

    let index = app.result_scroll().min(result.answers.len().saturating_sub(1));
    if let (Some(question), Some(answer)) = (session.questions().get(index), result.answers.get(index)) {
        render_review(frame, chunks[2], index, question, answer);
    }

    render_dashboard(frame, chunks[3], &app.dashboard(), app.notice());
    render_controls(frame, chunks[4]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &SessionResult) {
    let percentage = result.percentage();
    let heading = if result.timed_out { "TIME'S UP" } else { "RESULTS" };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(heading, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", result.score, result.total, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} unanswered  ·  time {}",
                result.unanswered(),
                format_clock(result.elapsed_secs)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    result: &SessionResult,
    questions: &[Question],
    scroll: usize,
) {
    let lines: Vec<Line> = result
        .answers
        .iter()
        .zip(questions.iter())
        .enumerate()
        .map(|(index, (answer, question))| {
            let (symbol, color) = match answer.selected {
                None => ("?", Color::DarkGray),
                Some(_) if answer.is_correct => ("+", Color::Green),
                Some(_) => ("-", Color::Red),
            };
            let marker = if index == scroll { ">" } else { " " };

            Line::from(vec![
                Span::styled(format!("{}{} ", marker, symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(&question.prompt), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_review(frame: &mut Frame, area: Rect, index: usize, question: &Question, answer: &Answer) {
    let yours = match answer.selected {
        Some(option) => format!(
            "{}. {}",
            option_label(option),
            question.options.get(option).map(String::as_str).unwrap_or("")
        ),
        None => "not answered".to_string(),
    };
    let correct = format!(
        "{}. {}",
        option_label(question.correct_option),
        question.options[question.correct_option]
    );

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Your answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                yours,
                Style::default().fg(if answer.is_correct { Color::Green } else { Color::Red }),
            ),
        ]),
        Line::from(vec![
            Span::styled("Correct:     ", Style::default().fg(Color::DarkGray)),
            Span::styled(correct, Style::default().fg(Color::Green)),
        ]),
    ];
    if let Some(explanation) = &question.explanation {
        lines.push(Line::from(Span::styled(
            explanation.as_str(),
            Style::default().fg(Color::Gray),
        )));
    }
    if !question.references.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("See: {}", question.references.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(format!(" Question {} ", index + 1))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, stats: &DashboardStats, notice: Option<&str>) {
    let line = match notice {
        Some(notice) => Line::from(Span::styled(notice, Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            format!(
                "{} tests  ·  avg {:.0}%  ·  best {:.0}%  ·  {} correct of {}  ·  {} practiced",
                stats.tests_taken,
                stats.average_percentage,
                stats.best_percentage,
                stats.correct,
                stats.questions_seen,
                format_clock(stats.total_time_secs)
            ),
            Style::default().fg(Color::Cyan),
        )),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k review  ·  r new attempt  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
