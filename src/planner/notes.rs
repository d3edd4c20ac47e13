use serde::{Deserialize, Serialize};

use super::buckets::RelativeDay;
use crate::storage::{read_json, write_json, SharedStore, StorageResult};

pub const NOTES_KEY: &str = "multiDayNotes";

/// Free text for yesterday, today and tomorrow. Shared by all users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNotes {
    pub yesterday: String,
    pub today: String,
    pub tomorrow: String,
}

impl DayNotes {
    pub fn get(&self, day: RelativeDay) -> &str {
        match day {
            RelativeDay::Yesterday => &self.yesterday,
            RelativeDay::Today => &self.today,
            RelativeDay::Tomorrow => &self.tomorrow,
        }
    }

    fn slot(&mut self, day: RelativeDay) -> &mut String {
        match day {
            RelativeDay::Yesterday => &mut self.yesterday,
            RelativeDay::Today => &mut self.today,
            RelativeDay::Tomorrow => &mut self.tomorrow,
        }
    }
}

/// Day notes bound to their storage key.
pub struct Notebook {
    notes: DayNotes,
    store: SharedStore,
}

impl Notebook {
    pub fn load(store: SharedStore) -> Self {
        let notes = read_json(&*store, NOTES_KEY).unwrap_or_default();
        Self { notes, store }
    }

    pub fn get(&self, day: RelativeDay) -> &str {
        self.notes.get(day)
    }

    pub fn set(&mut self, day: RelativeDay, text: String) -> StorageResult<()> {
        *self.notes.slot(day) = text;
        self.persist()
    }

    pub fn push_char(&mut self, day: RelativeDay, c: char) -> StorageResult<()> {
        self.notes.slot(day).push(c);
        self.persist()
    }

    pub fn pop_char(&mut self, day: RelativeDay) -> StorageResult<()> {
        if self.notes.slot(day).pop().is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> StorageResult<()> {
        write_json(&*self.store, NOTES_KEY, &self.notes)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn partial_object_fills_missing_days() {
        let store = Rc::new(MemoryStore::default());
        store.set(NOTES_KEY, r#"{"today":"ship it"}"#.to_string()).unwrap();

        let book = Notebook::load(store);
        assert_eq!(book.get(RelativeDay::Today), "ship it");
        assert_eq!(book.get(RelativeDay::Yesterday), "");
        assert_eq!(book.get(RelativeDay::Tomorrow), "");
    }

    #[test]
    fn corrupt_value_loads_defaults() {
        let store = Rc::new(MemoryStore::default());
        store.set(NOTES_KEY, "{not json".to_string()).unwrap();
        let book = Notebook::load(store);
        for day in RelativeDay::ALL {
            assert_eq!(book.get(day), "");
        }
    }

    #[test]
    fn edits_rewrite_all_three_keys() {
        let store = Rc::new(MemoryStore::default());
        let mut book = Notebook::load(store.clone());
        book.set(RelativeDay::Tomorrow, "plan".to_string()).unwrap();
        book.push_char(RelativeDay::Tomorrow, '!').unwrap();
        book.push_char(RelativeDay::Yesterday, 'x').unwrap();
        book.pop_char(RelativeDay::Yesterday).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.get(NOTES_KEY).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"yesterday": "", "today": "", "tomorrow": "plan!"})
        );
    }
}
