use chrono::{DateTime, Utc};

use super::task::{NewTask, Task, TaskPatch};
use crate::storage::{read_json, write_json, SharedStore, StorageResult};

/// Storage key holding one owner's todos.
pub fn todos_key(owner: &str) -> String {
    format!("todos_{owner}")
}

/// Persistence for per-owner task sets.
pub trait TaskRepository {
    /// The owner's tasks in stored order. Missing or unreadable data is empty.
    fn load(&self, owner: &str) -> Vec<Task>;

    /// Overwrite the owner's full task set.
    fn save(&self, owner: &str, tasks: &[Task]) -> StorageResult<()>;
}

/// `TaskRepository` over a key-value store, one key per owner.
#[derive(Clone)]
pub struct LocalTasks {
    store: SharedStore,
}

impl LocalTasks {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl TaskRepository for LocalTasks {
    fn load(&self, owner: &str) -> Vec<Task> {
        let tasks: Vec<Task> = read_json(&*self.store, &todos_key(owner)).unwrap_or_default();
        let total = tasks.len();
        let owned: Vec<Task> = tasks.into_iter().filter(|t| t.email == owner).collect();
        if owned.len() != total {
            tracing::warn!(owner, skipped = total - owned.len(), "ignoring tasks stored under another owner");
        }
        owned
    }

    fn save(&self, owner: &str, tasks: &[Task]) -> StorageResult<()> {
        let owned: Vec<&Task> = tasks.iter().filter(|t| t.email == owner).collect();
        if owned.len() != tasks.len() {
            tracing::warn!(owner, dropped = tasks.len() - owned.len(), "refusing to store tasks of another owner");
        }
        write_json(&*self.store, &todos_key(owner), &owned)
    }
}

/// The signed-in user's tasks, kept in sync with a repository.
///
/// Every mutation that changes something rewrites the whole set.
pub struct TaskList<R> {
    owner: String,
    tasks: Vec<Task>,
    repo: R,
}

impl<R: TaskRepository> TaskList<R> {
    pub fn load(owner: impl Into<String>, repo: R) -> Self {
        let owner = owner.into();
        let tasks = repo.load(&owner);
        tracing::debug!(owner = %owner, count = tasks.len(), "tasks loaded");
        Self { owner, tasks, repo }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Prepend a new task. A blank title is a no-op and returns `None`.
    pub fn add(&mut self, draft: NewTask, now: DateTime<Utc>) -> StorageResult<Option<&Task>> {
        let Some(task) = draft.into_task(&self.owner, now) else {
            return Ok(None);
        };
        tracing::info!(id = %task.id, "task added");
        self.tasks.insert(0, task);
        self.persist()?;
        Ok(self.tasks.first())
    }

    /// Replace a task's editable fields. Returns whether anything was applied.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> StorageResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if !patch.apply(task) {
            return Ok(false);
        }
        tracing::info!(id, "task updated");
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> StorageResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        tracing::info!(id, "task removed");
        self.persist()?;
        Ok(true)
    }

    /// Flip completion. Returns the new state, or `None` for an unknown id.
    pub fn toggle_complete(&mut self, id: &str) -> StorageResult<Option<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.completed = !task.completed;
        let completed = task.completed;
        tracing::info!(id, completed, "task toggled");
        self.persist()?;
        Ok(Some(completed))
    }

    fn persist(&self) -> StorageResult<()> {
        self.repo.save(&self.owner, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    const ADA: &str = "ada@example.com";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap()
    }

    fn draft(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn setup() -> (Rc<MemoryStore>, TaskList<LocalTasks>) {
        let store = Rc::new(MemoryStore::default());
        let list = TaskList::load(ADA, LocalTasks::new(store.clone()));
        (store, list)
    }

    fn stored(store: &MemoryStore, owner: &str) -> Vec<Task> {
        serde_json::from_str(&store.get(&todos_key(owner)).unwrap()).unwrap()
    }

    #[test]
    fn add_grows_stored_set_by_one_with_active_owner() {
        let (store, mut list) = setup();
        list.add(draft("first"), now()).unwrap();
        let before = stored(&store, ADA).len();

        let id = list.add(draft("second"), now()).unwrap().unwrap().id.clone();

        let after = stored(&store, ADA);
        assert_eq!(after.len(), before + 1);
        assert_eq!(after[0].id, id);
        assert!(after.iter().all(|t| t.email == ADA));
    }

    #[test]
    fn add_with_blank_title_writes_nothing() {
        let (store, mut list) = setup();
        assert!(list.add(draft("   "), now()).unwrap().is_none());
        assert!(list.tasks().is_empty());
        assert_eq!(store.get(&todos_key(ADA)), None);
    }

    #[test]
    fn remove_deletes_exactly_one() {
        let (store, mut list) = setup();
        for title in ["a", "b", "c"] {
            list.add(draft(title), now()).unwrap();
        }
        let victim = list.tasks()[1].clone();
        let expected: Vec<Task> = list
            .tasks()
            .iter()
            .filter(|t| t.id != victim.id)
            .cloned()
            .collect();

        assert!(list.remove(&victim.id).unwrap());
        assert_eq!(list.tasks(), expected.as_slice());
        assert_eq!(stored(&store, ADA), expected);

        assert!(!list.remove(&victim.id).unwrap());
    }

    #[test]
    fn toggle_twice_restores_original() {
        let (_store, mut list) = setup();
        let id = list.add(draft("Buy milk"), now()).unwrap().unwrap().id.clone();
        let original = list.get(&id).unwrap().clone();

        assert_eq!(list.toggle_complete(&id).unwrap(), Some(true));
        let toggled = list.get(&id).unwrap().clone();
        assert_eq!(
            Task {
                completed: false,
                ..toggled
            },
            original
        );

        assert_eq!(list.toggle_complete(&id).unwrap(), Some(false));
        assert_eq!(list.get(&id).unwrap(), &original);
    }

    #[test]
    fn toggle_unknown_id_is_none() {
        let (_store, mut list) = setup();
        assert_eq!(list.toggle_complete("missing").unwrap(), None);
    }

    #[test]
    fn update_replaces_editable_fields() {
        let (store, mut list) = setup();
        let id = list.add(draft("Breakfast"), now()).unwrap().unwrap().id.clone();

        let mut patch = TaskPatch::from_task(list.get(&id).unwrap());
        patch.title = "Breakfast options".to_string();
        patch.description = "pick one".to_string();
        patch.add_option("idli");
        assert!(list.update(&id, patch).unwrap());

        let task = &stored(&store, ADA)[0];
        assert_eq!(task.title, "Breakfast options");
        assert_eq!(task.description.as_deref(), Some("pick one"));
        assert_eq!(task.options.len(), 1);
        assert_eq!(task.created_at, now());
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (_store, mut list) = setup();
        let patch = TaskPatch {
            title: "x".to_string(),
            ..Default::default()
        };
        assert!(!list.update("missing", patch).unwrap());
    }

    #[test]
    fn load_of_malformed_value_is_empty() {
        let store = Rc::new(MemoryStore::default());
        store.set(&todos_key(ADA), "{not json".to_string()).unwrap();
        let list = TaskList::load(ADA, LocalTasks::new(store));
        assert!(list.tasks().is_empty());
    }

    #[test]
    fn reload_round_trips_every_field() {
        let (store, mut list) = setup();
        let id = list.add(draft("a"), now()).unwrap().unwrap().id.clone();
        let mut patch = TaskPatch::from_task(list.get(&id).unwrap());
        patch.description = "details".to_string();
        patch.add_option("one");
        list.update(&id, patch).unwrap();
        list.toggle_complete(&id).unwrap();
        list.add(draft("b"), now()).unwrap();

        let reloaded = TaskList::load(ADA, LocalTasks::new(store));
        assert_eq!(reloaded.tasks(), list.tasks());
    }

    #[test]
    fn foreign_tasks_are_filtered_on_read_and_write() {
        let store = Rc::new(MemoryStore::default());
        let repo = LocalTasks::new(store.clone());
        let mine = draft("mine").into_task(ADA, now()).unwrap();
        let theirs = draft("theirs").into_task("bob@example.com", now()).unwrap();

        repo.save(ADA, &[mine.clone(), theirs.clone()]).unwrap();
        assert_eq!(stored(&store, ADA), vec![mine.clone()]);

        write_json(&*store, &todos_key(ADA), &vec![mine.clone(), theirs]).unwrap();
        assert_eq!(repo.load(ADA), vec![mine]);
    }

    #[test]
    fn owners_are_partitioned() {
        let store = Rc::new(MemoryStore::default());
        let mut ada = TaskList::load(ADA, LocalTasks::new(store.clone()));
        ada.add(draft("ada's"), now()).unwrap();

        let bob = TaskList::load("bob@example.com", LocalTasks::new(store));
        assert!(bob.tasks().is_empty());
    }
}
