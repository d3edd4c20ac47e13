use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color tag of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum EventColor {
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Pink,
    Violet,
}

impl EventColor {
    pub const ALL: [EventColor; 6] = [
        EventColor::Blue,
        EventColor::Red,
        EventColor::Green,
        EventColor::Yellow,
        EventColor::Pink,
        EventColor::Violet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Red => "red",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Pink => "pink",
            EventColor::Violet => "violet",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

// Unknown tags read as blue instead of failing the whole event list.
impl From<String> for EventColor {
    fn from(s: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }
}

impl From<EventColor> for &'static str {
    fn from(color: EventColor) -> Self {
        color.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub color: EventColor,
}

impl CalendarEvent {
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.date.with_timezone(tz).date_naive()
    }
}

/// User input for a new calendar event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub color: EventColor,
}

impl NewEvent {
    pub fn into_event(self, owner: &str) -> Option<CalendarEvent> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(CalendarEvent {
            id: Uuid::new_v4().to_string(),
            email: owner.to_string(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            date: self.date,
            color: self.color,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: String,
    pub description: String,
    pub color: EventColor,
}

impl EventPatch {
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            color: event.color,
        }
    }

    pub fn apply(self, event: &mut CalendarEvent) -> bool {
        let title = self.title.trim();
        if title.is_empty() {
            return false;
        }
        event.title = title.to_string();
        event.description = self.description;
        event.color = self.color;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_reads_known_and_unknown_tags() {
        let colors: Vec<EventColor> =
            serde_json::from_str(r#"["violet","PINK","teal",""]"#).unwrap();
        assert_eq!(
            colors,
            vec![
                EventColor::Violet,
                EventColor::Pink,
                EventColor::Blue,
                EventColor::Blue
            ]
        );
    }

    #[test]
    fn color_writes_lowercase_tag() {
        assert_eq!(serde_json::to_string(&EventColor::Yellow).unwrap(), r#""yellow""#);
    }

    #[test]
    fn color_cycle_wraps() {
        assert_eq!(EventColor::Blue.next(), EventColor::Red);
        assert_eq!(EventColor::Violet.next(), EventColor::Blue);
    }

    #[test]
    fn new_event_requires_title() {
        let draft = NewEvent {
            title: "  ".to_string(),
            ..Default::default()
        };
        assert!(draft.into_event("a@b").is_none());

        let event = NewEvent {
            title: " Standup ".to_string(),
            description: " daily ".to_string(),
            ..Default::default()
        }
        .into_event("a@b")
        .unwrap();
        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, "daily");
        assert_eq!(event.color, EventColor::Blue);
    }
}
