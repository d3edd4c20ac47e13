use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short label attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOption {
    pub id: String,
    pub text: String,
}

impl TaskOption {
    /// Build an option from user input. Blank text gives `None`.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Owner's email; the partition key.
    pub email: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<TaskOption>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// The date used for bucketing: the due date, or creation when unset.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.due_date.unwrap_or(self.created_at)
    }
}

/// User input for a new task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Build the record, or `None` when the title is blank.
    pub fn into_task(self, owner: &str, now: DateTime<Utc>) -> Option<Task> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let description = self.description.trim();

        Some(Task {
            id: Uuid::new_v4().to_string(),
            email: owner.to_string(),
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            options: Vec::new(),
            completed: false,
            created_at: now,
            due_date: Some(self.due_date.unwrap_or(now)),
        })
    }
}

/// Replacement values for a task's editable fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: String,
    pub description: String,
    pub options: Vec<TaskOption>,
}

impl TaskPatch {
    /// Seed an edit from the task's current values.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            options: task.options.clone(),
        }
    }

    pub fn add_option(&mut self, text: &str) -> bool {
        match TaskOption::new(text) {
            Some(option) => {
                self.options.push(option);
                true
            }
            None => false,
        }
    }

    pub fn remove_option(&mut self, id: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.id != id);
        self.options.len() != before
    }

    /// Apply onto `task`. Returns false, leaving the task untouched, when the
    /// title is blank.
    pub fn apply(self, task: &mut Task) -> bool {
        let title = self.title.trim();
        if title.is_empty() {
            return false;
        }
        let description = self.description.trim();

        task.title = title.to_string();
        task.description = (!description.is_empty()).then(|| description.to_string());
        task.options = self.options;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap()
    }

    #[test]
    fn new_task_trims_and_defaults_due_date() {
        let task = NewTask {
            title: "  Buy milk ".to_string(),
            description: "   ".to_string(),
            due_date: None,
        }
        .into_task("ada@example.com", now())
        .unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, None);
        assert_eq!(task.email, "ada@example.com");
        assert!(!task.completed);
        assert_eq!(task.due_date, Some(now()));
        assert!(task.options.is_empty());
    }

    #[test]
    fn blank_title_builds_nothing() {
        let draft = NewTask {
            title: " \t ".to_string(),
            ..Default::default()
        };
        assert!(draft.into_task("ada@example.com", now()).is_none());
    }

    #[test]
    fn effective_date_falls_back_to_creation() {
        let mut task = NewTask {
            title: "x".to_string(),
            ..Default::default()
        }
        .into_task("a@b", now())
        .unwrap();
        task.due_date = None;
        assert_eq!(task.effective_date(), now());
    }

    #[test]
    fn decodes_record_without_optional_fields() {
        let json = r#"{"id":"1","email":"a@b","title":"t","completed":true,"created_at":"2025-03-20T15:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.description, None);
        assert!(task.options.is_empty());
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, now());
        assert!(task.completed);
    }

    #[test]
    fn patch_options_add_and_remove() {
        let mut patch = TaskPatch::default();
        assert!(patch.add_option(" idli "));
        assert!(patch.add_option("dosa"));
        assert!(!patch.add_option("  "));
        assert_eq!(patch.options.len(), 2);
        assert_eq!(patch.options[0].text, "idli");

        let first = patch.options[0].id.clone();
        assert!(patch.remove_option(&first));
        assert!(!patch.remove_option(&first));
        assert_eq!(patch.options.len(), 1);
        assert_eq!(patch.options[0].text, "dosa");
    }

    #[test]
    fn patch_with_blank_title_is_rejected() {
        let mut task = NewTask {
            title: "keep".to_string(),
            ..Default::default()
        }
        .into_task("a@b", now())
        .unwrap();
        let original = task.clone();

        let patch = TaskPatch {
            title: "  ".to_string(),
            description: "changed".to_string(),
            options: Vec::new(),
        };
        assert!(!patch.apply(&mut task));
        assert_eq!(task, original);
    }
}
