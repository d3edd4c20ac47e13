use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::task_form::help_line;
use super::{centered, render_field};
use crate::planner::{CalendarEvent, EventColor, EventPatch};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Description,
    Date,
    Color,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Date,
            FormField::Date => FormField::Color,
            FormField::Color => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Color,
            FormField::Description => FormField::Title,
            FormField::Date => FormField::Description,
            FormField::Color => FormField::Date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    /// Set when editing an existing event.
    pub editing: Option<String>,
    pub title: String,
    pub description: String,
    pub date: String,
    pub color: EventColor,
    pub active_field: FormField,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            color: EventColor::default(),
            active_field: FormField::Title,
        }
    }

    pub fn edit(event: &CalendarEvent, date: NaiveDate) -> Self {
        Self {
            editing: Some(event.id.clone()),
            title: event.title.clone(),
            description: event.description.clone(),
            date: date.format("%Y-%m-%d").to_string(),
            color: event.color,
            active_field: FormField::Title,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
        if self.editing.is_some() && self.active_field == FormField::Date {
            self.active_field = self.active_field.next();
        }
    }

    pub fn prev_field(&mut self) {
        self.active_field = self.active_field.prev();
        if self.editing.is_some() && self.active_field == FormField::Date {
            self.active_field = self.active_field.prev();
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
            FormField::Date => self.date.push(c),
            FormField::Color => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Color => {}
        }
    }

    pub fn next_color(&mut self) {
        self.color = self.color.next();
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && self.parsed_date().is_some()
    }

    pub fn to_patch(&self) -> EventPatch {
        EventPatch {
            title: self.title.clone(),
            description: self.description.trim().to_string(),
            color: self.color,
        }
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let form_area = centered(area, 50, 9);
        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() {
            " Edit Event "
        } else {
            " New Event "
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::FORM_ACCENT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::FORM_ACCENT));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // description
            Constraint::Length(1), // date
            Constraint::Length(1), // color
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        render_field(frame, rows[0], "Title:", &state.title, state.active_field == FormField::Title);
        render_field(
            frame,
            rows[1],
            "Notes:",
            &state.description,
            state.active_field == FormField::Description,
        );
        let date_active = state.editing.is_none() && state.active_field == FormField::Date;
        render_field(frame, rows[2], "Date:", &state.date, date_active);

        let swatch = Line::from(vec![
            Span::styled(
                format!("{:<7}", "Color:"),
                theme::DIM_STYLE,
            ),
            Span::styled("  ", Style::default().bg(theme::event_color(state.color))),
            Span::styled(
                format!(" {}", state.color.as_str()),
                if state.active_field == FormField::Color {
                    theme::ACTIVE_FIELD_STYLE
                } else {
                    Style::default()
                },
            ),
        ]);
        frame.render_widget(Paragraph::new(swatch), rows[3]);

        let help = if state.active_field == FormField::Color {
            help_line(&[("Space", "Color"), ("Enter", "Save"), ("Esc", "Cancel")])
        } else {
            help_line(&[("Tab", "Next"), ("Enter", "Save"), ("Esc", "Cancel")])
        };
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn new_form_validates_title_and_date() {
        let mut state = EventFormState::new(day());
        assert!(!state.is_valid());
        state.input_char('x');
        assert!(state.is_valid());

        state.active_field = FormField::Date;
        while !state.date.is_empty() {
            state.backspace();
        }
        assert_eq!(state.parsed_date(), None);
        assert!(!state.is_valid());

        for c in "2025-03".chars() {
            state.input_char(c);
        }
        assert_eq!(state.parsed_date(), None);

        // A single-digit day parses.
        for c in "-2".chars() {
            state.input_char(c);
        }
        assert_eq!(state.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 2));
        state.input_char('1');
        assert_eq!(state.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 21));
        assert!(state.is_valid());
    }

    #[test]
    fn editing_skips_date_field() {
        let event = CalendarEvent {
            id: "e1".to_string(),
            email: "a@b".to_string(),
            title: "Standup".to_string(),
            description: String::new(),
            date: chrono::Utc::now(),
            color: EventColor::Green,
        };
        let mut state = EventFormState::edit(&event, day());
        state.next_field();
        state.next_field();
        assert_eq!(state.active_field, FormField::Color);
        state.prev_field();
        assert_eq!(state.active_field, FormField::Description);
        state.next_color();
        assert_eq!(state.to_patch().color, EventColor::Yellow);
    }
}
