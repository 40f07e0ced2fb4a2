mod quiz;
mod result;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match &app.screen {
        Screen::Loading => status::render_loading(frame, area, app),
        Screen::LoadFailed(message) => status::render_failed(frame, area, message),
        Screen::Empty => status::render_empty(frame, area, app),
        Screen::Testing => quiz::render(frame, area, app),
        Screen::Results => result::render(frame, area, app),
    }
}

/// Letter label for an option index: A, B, C...
pub(crate) fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
