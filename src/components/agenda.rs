use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::planner::CalendarEvent;
use crate::theme;

/// Month agenda: the days that have events, next to the selected day's events.
pub struct Agenda;

impl Agenda {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        days_with_events: &BTreeSet<u32>,
        day_events: &[&CalendarEvent],
        selected_event: usize,
    ) {
        let month_w = if area.width >= 90 { 30 } else { 22 };
        let cols = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

        render_month(frame, cols[0], selected_date, today, days_with_events);
        render_day(frame, cols[1], selected_date, day_events, selected_event);
    }
}

fn render_month(
    frame: &mut Frame,
    area: Rect,
    selected_date: NaiveDate,
    today: NaiveDate,
    days_with_events: &BTreeSet<u32>,
) {
    let block = Block::default()
        .title(format!(" {} ", selected_date.format("%B %Y")))
        .title_style(theme::HEADER_STYLE)
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE);

    // The selected day is always listed, even without events.
    let mut days = days_with_events.clone();
    days.insert(selected_date.day());

    let items: Vec<ListItem> = days
        .into_iter()
        .filter_map(|d| selected_date.with_day(d))
        .map(|date| {
            let marker = if days_with_events.contains(&date.day()) { "\u{2022}" } else { " " };
            let style = if date == selected_date {
                theme::SELECTED_STYLE
            } else if date == today {
                theme::TODAY_STYLE
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), theme::DIM_STYLE),
                Span::styled(date.format("%a %d").to_string(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_day(
    frame: &mut Frame,
    area: Rect,
    date: NaiveDate,
    events: &[&CalendarEvent],
    selected_event: usize,
) {
    let n = events.len();
    let count = if n == 0 {
        String::new()
    } else {
        format!(" {} event{} ", n, if n == 1 { "" } else { "s" })
    };

    let block = Block::default()
        .title(format!(" {} ", date.format("%A, %B %d, %Y")))
        .title_style(theme::HEADER_STYLE)
        .title_bottom(Line::from(Span::styled(count, theme::DIM_STYLE)))
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE);

    if events.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let msg = Paragraph::new("No events. Press n to add one.").style(theme::DIM_STYLE);
        frame.render_widget(msg, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, ev) in events.iter().enumerate() {
        let title_style = if i == selected_event {
            theme::SELECTED_STYLE
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::styled("  ", Style::default().bg(theme::event_color(ev.color))),
            Span::raw(" "),
            Span::styled(ev.title.clone(), title_style),
        ]));
        for text in ev.description.lines() {
            lines.push(Line::from(Span::styled(format!("   {text}"), theme::DIM_STYLE)));
        }
        lines.push(Line::from(""));
    }

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}
