use std::cmp::Ordering;

use chrono::NaiveDate;
use ratatui::style::{Color, Modifier, Style};

use crate::planner::EventColor;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const FOCUS_BORDER_STYLE: Style = Style::new().fg(Color::Cyan);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);
pub const TODAY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);
pub const DONE_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);
pub const OPTION_STYLE: Style = Style::new().fg(Color::Gray).bg(Color::Rgb(48, 48, 48));
pub const KEY_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const FORM_ACCENT: Color = Color::Green;
pub const ACTIVE_FIELD_STYLE: Style = Style::new().fg(Color::Cyan);

/// Underline color of a day column header: red for past days, green for
/// today, orange for future days.
pub fn day_accent(date: NaiveDate, today: NaiveDate) -> Color {
    match date.cmp(&today) {
        Ordering::Less => Color::Red,
        Ordering::Equal => Color::Green,
        Ordering::Greater => Color::Rgb(255, 165, 0),
    }
}

pub fn event_color(color: EventColor) -> Color {
    match color {
        EventColor::Blue => Color::Blue,
        EventColor::Red => Color::Red,
        EventColor::Green => Color::Green,
        EventColor::Yellow => Color::Yellow,
        EventColor::Pink => Color::Rgb(236, 72, 153),
        EventColor::Violet => Color::Rgb(139, 92, 246),
    }
}
