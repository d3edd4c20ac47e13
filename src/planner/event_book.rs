use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, TimeZone};

use super::event::{CalendarEvent, EventPatch, NewEvent};
use crate::storage::{read_json, write_json, SharedStore, StorageResult};

/// Key shared by every user's calendar events.
pub const EVENTS_KEY: &str = "tasks";

pub trait EventRepository {
    fn load(&self, owner: &str) -> Vec<CalendarEvent>;

    /// Replace the owner's events, leaving other owners' events in place.
    fn save(&self, owner: &str, events: &[CalendarEvent]) -> StorageResult<()>;
}

/// `EventRepository` over the shared `tasks` key.
#[derive(Clone)]
pub struct LocalEvents {
    store: SharedStore,
}

impl LocalEvents {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn all(&self) -> Vec<CalendarEvent> {
        read_json(&*self.store, EVENTS_KEY).unwrap_or_default()
    }
}

impl EventRepository for LocalEvents {
    fn load(&self, owner: &str) -> Vec<CalendarEvent> {
        self.all().into_iter().filter(|e| e.email == owner).collect()
    }

    fn save(&self, owner: &str, events: &[CalendarEvent]) -> StorageResult<()> {
        let mut merged: Vec<CalendarEvent> =
            self.all().into_iter().filter(|e| e.email != owner).collect();
        let others = merged.len();

        merged.extend(events.iter().filter(|e| e.email == owner).cloned());
        if merged.len() - others != events.len() {
            tracing::warn!(owner, "refusing to store events of another owner");
        }

        write_json(&*self.store, EVENTS_KEY, &merged)
    }
}

/// The signed-in user's calendar events.
pub struct EventBook<R> {
    owner: String,
    events: Vec<CalendarEvent>,
    repo: R,
}

impl<R: EventRepository> EventBook<R> {
    pub fn load(owner: impl Into<String>, repo: R) -> Self {
        let owner = owner.into();
        let events = repo.load(&owner);
        tracing::debug!(owner = %owner, count = events.len(), "events loaded");
        Self { owner, events, repo }
    }

    #[cfg(test)]
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn add(&mut self, draft: NewEvent) -> StorageResult<Option<&CalendarEvent>> {
        let Some(event) = draft.into_event(&self.owner) else {
            return Ok(None);
        };
        tracing::info!(id = %event.id, "event added");
        self.events.push(event);
        self.persist()?;
        Ok(self.events.last())
    }

    pub fn update(&mut self, id: &str, patch: EventPatch) -> StorageResult<bool> {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        if !patch.apply(event) {
            return Ok(false);
        }
        tracing::info!(id, "event updated");
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> StorageResult<bool> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Ok(false);
        }
        tracing::info!(id, "event removed");
        self.persist()?;
        Ok(true)
    }

    /// Events falling on `date` in `tz`, earliest first.
    pub fn events_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| e.local_date(tz) == date)
            .collect();
        events.sort_by_key(|e| e.date);
        events
    }

    /// Days of the month that have at least one event.
    pub fn days_with_events<Tz: TimeZone>(&self, year: i32, month: u32, tz: &Tz) -> BTreeSet<u32> {
        self.events
            .iter()
            .map(|e| e.local_date(tz))
            .filter(|d| d.year() == year && d.month() == month)
            .map(|d| d.day())
            .collect()
    }

    fn persist(&self) -> StorageResult<()> {
        self.repo.save(&self.owner, &self.events)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::planner::event::EventColor;
    use crate::storage::{KeyValueStore, MemoryStore};

    const ADA: &str = "ada@example.com";
    const BOB: &str = "bob@example.com";

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    fn draft(title: &str, date: DateTime<Utc>) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            date,
            ..Default::default()
        }
    }

    #[test]
    fn save_keeps_other_owners_events() {
        let store = Rc::new(MemoryStore::default());
        let mut bob = EventBook::load(BOB, LocalEvents::new(store.clone()));
        bob.add(draft("bob's", at(3, 9))).unwrap();

        let mut ada = EventBook::load(ADA, LocalEvents::new(store.clone()));
        assert!(ada.events().is_empty());
        ada.add(draft("ada's", at(4, 9))).unwrap();

        let all: Vec<CalendarEvent> =
            serde_json::from_str(&store.get(EVENTS_KEY).unwrap()).unwrap();
        assert_eq!(all.len(), 2);

        let bob = EventBook::load(BOB, LocalEvents::new(store));
        assert_eq!(bob.events().len(), 1);
        assert_eq!(bob.events()[0].title, "bob's");
    }

    #[test]
    fn save_drops_foreign_records() {
        let store = Rc::new(MemoryStore::default());
        let repo = LocalEvents::new(store);
        let foreign = draft("x", at(1, 0)).into_event(BOB).unwrap();

        repo.save(ADA, &[foreign]).unwrap();
        assert!(repo.load(BOB).is_empty());
    }

    #[test]
    fn blank_title_is_not_added() {
        let store = Rc::new(MemoryStore::default());
        let mut book = EventBook::load(ADA, LocalEvents::new(store.clone()));
        assert!(book.add(draft(" ", at(1, 0))).unwrap().is_none());
        assert_eq!(store.get(EVENTS_KEY), None);
    }

    #[test]
    fn update_and_remove() {
        let store = Rc::new(MemoryStore::default());
        let mut book = EventBook::load(ADA, LocalEvents::new(store.clone()));
        let id = book.add(draft("Dentist", at(5, 14))).unwrap().unwrap().id.clone();

        let mut patch = EventPatch::from_event(book.get(&id).unwrap());
        patch.title = " Dentist (moved) ".to_string();
        patch.color = EventColor::Red;
        assert!(book.update(&id, patch).unwrap());

        let reloaded = EventBook::load(ADA, LocalEvents::new(store.clone()));
        assert_eq!(reloaded.get(&id).unwrap().title, "Dentist (moved)");
        assert_eq!(reloaded.get(&id).unwrap().color, EventColor::Red);

        assert!(!book.update(&id, EventPatch::default()).unwrap());
        assert!(book.remove(&id).unwrap());
        assert!(!book.remove(&id).unwrap());
        assert!(EventBook::load(ADA, LocalEvents::new(store)).events().is_empty());
    }

    #[test]
    fn day_and_month_queries() {
        let store = Rc::new(MemoryStore::default());
        let mut book = EventBook::load(ADA, LocalEvents::new(store));
        book.add(draft("late", at(5, 18))).unwrap();
        book.add(draft("early", at(5, 8))).unwrap();
        book.add(draft("other", at(20, 8))).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let titles: Vec<&str> = book.events_on(day, &Utc).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);

        let days: Vec<u32> = book.days_with_events(2025, 3, &Utc).into_iter().collect();
        assert_eq!(days, vec![5, 20]);
        assert!(book.days_with_events(2025, 4, &Utc).is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let store = Rc::new(MemoryStore::default());
        store.set(EVENTS_KEY, "{not json".to_string()).unwrap();
        let book = EventBook::load(ADA, LocalEvents::new(store));
        assert!(book.events().is_empty());
    }
}
