//! Task Persistence Service
//!
//! Owns the reactive task collection and the single-slot draft, mirrored to a
//! [`KeyValueStore`]. The in-memory collection is authoritative; every
//! mutation rewrites the whole list under [`TASKS_KEY`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reactive_stores::Store;
use leptos::prelude::*;

use super::{KeyValueStore, StorageError, StorageResult};
use crate::models::{new_id, SubTask, Task, TaskDraft, TaskInput};
use crate::store::{
    store_find_task, store_push_task, store_remove_task, store_replace_task, TaskState,
    TaskStateStoreFields, TaskStore,
};

pub const TASKS_KEY: &str = "task-manager-tasks";
pub const DRAFT_KEY: &str = "task-manager-draft";

/// Source of "now" for timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct TaskStorage {
    state: TaskStore,
    backend: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl TaskStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(backend, Arc::new(Utc::now))
    }

    pub fn with_clock(backend: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let tasks = load_tasks(backend.as_ref());
        tracing::debug!(count = tasks.len(), "tasks loaded");
        Self {
            state: Store::new(TaskState { tasks }),
            backend,
            clock,
        }
    }

    /// Reactive store for views
    pub fn store(&self) -> TaskStore {
        self.state
    }

    /// Snapshot of all tasks in creation order
    pub fn load_all(&self) -> Vec<Task> {
        self.state.tasks().get_untracked()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Task> {
        store_find_task(&self.state, id)
    }

    /// Insert or update
    ///
    /// An id with a stored match replaces that task, keeping `created_at`.
    /// Anything else creates a task with a fresh id.
    pub fn save(&self, input: TaskInput) -> Task {
        let now = (self.clock)();
        let existing = input.id.as_deref().and_then(|id| self.get_by_id(id));

        let task = match existing {
            Some(existing) => {
                let task = Task {
                    id: existing.id,
                    title: input.title,
                    description: input.description,
                    priority: input.priority,
                    sub_tasks: input.sub_tasks,
                    tags: input.tags,
                    created_at: existing.created_at,
                    updated_at: now.max(existing.created_at),
                };
                store_replace_task(&self.state, task.clone());
                tracing::debug!(id = %task.id, "task updated");
                task
            }
            None => {
                let task = Task {
                    id: new_id(),
                    title: input.title,
                    description: input.description,
                    priority: input.priority,
                    sub_tasks: input.sub_tasks,
                    tags: input.tags,
                    created_at: now,
                    updated_at: now,
                };
                store_push_task(&self.state, task.clone());
                tracing::debug!(id = %task.id, "task created");
                task
            }
        };

        self.flush_logged();
        task
    }

    /// Remove a task, returns whether one was removed
    pub fn delete(&self, id: &str) -> bool {
        let removed = store_remove_task(&self.state, id);
        if removed {
            tracing::debug!(id, "task deleted");
            self.flush_logged();
        }
        removed
    }

    pub fn create_sub_task(&self, content: &str) -> SubTask {
        SubTask::new(content)
    }

    pub fn save_draft(&self, draft: &TaskDraft) {
        let result = serde_json::to_string(draft)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(DRAFT_KEY, &json));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to save draft");
        }
    }

    /// Stored draft, `None` when missing or unreadable
    pub fn get_draft(&self) -> Option<TaskDraft> {
        let raw = match self.backend.get(DRAFT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(error = %e, "failed to read draft");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable draft");
                None
            }
        }
    }

    pub fn clear_draft(&self) {
        if let Err(e) = self.backend.remove(DRAFT_KEY) {
            tracing::error!(error = %e, "failed to clear draft");
        }
    }

    fn flush(&self) -> StorageResult<()> {
        let json = self
            .state
            .tasks()
            .with_untracked(|tasks| serde_json::to_string(tasks))?;
        self.backend.set(TASKS_KEY, &json)
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, "failed to persist tasks");
        }
    }
}

/// Stored tasks
///
/// Unparseable or unreadable data yields an empty list. Records that fail to
/// decode on their own are skipped so the rest of the collection survives.
fn load_tasks(backend: &dyn KeyValueStore) -> Vec<Task> {
    let raw = match backend.get(TASKS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read stored tasks");
            return Vec::new();
        }
    };
    let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "stored tasks are unreadable, starting empty");
            return Vec::new();
        }
    };
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable task record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskDraft};
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    /// Backend whose reads, writes and removes can be made to fail
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        fail_removes: AtomicBool,
    }

    impl FailingStore {
        fn check(flag: &AtomicBool, op: &str) -> StorageResult<()> {
            if flag.load(Ordering::SeqCst) {
                Err(StorageError::Backend(format!("{} refused", op)))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Self::check(&self.fail_reads, "get")?;
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            Self::check(&self.fail_writes, "set")?;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            Self::check(&self.fail_removes, "remove")?;
            self.inner.remove(key)
        }
    }

    fn setup_failing(backend: &Arc<FailingStore>) -> TaskStorage {
        TaskStorage::with_clock(backend.clone(), ticking_clock())
    }

    /// Clock that advances one second per reading
    fn ticking_clock() -> Clock {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let ticks = Arc::new(AtomicI64::new(0));
        Arc::new(move || start + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst)))
    }

    fn setup(backend: &MemoryStore) -> TaskStorage {
        TaskStorage::with_clock(Arc::new(backend.clone()), ticking_clock())
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            priority: Priority::Medium,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_empty_without_stored_data() {
        let storage = setup(&MemoryStore::new());
        assert!(storage.load_all().is_empty());
    }

    #[test]
    fn test_save_without_id_creates_task() {
        let storage = setup(&MemoryStore::new());
        let created = storage.save(input("Write report"));

        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(storage.get_by_id(&created.id), Some(created.clone()));
        assert_eq!(storage.load_all(), vec![created]);
    }

    #[test]
    fn test_save_twice_creates_distinct_ids() {
        let storage = setup(&MemoryStore::new());
        let a = storage.save(input("First task"));
        let b = storage.save(input("Second task"));
        assert_ne!(a.id, b.id);
        let titles: Vec<_> = storage.load_all().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["First task", "Second task"]);
    }

    #[test]
    fn test_update_preserves_created_at_and_advances_updated_at() {
        let storage = setup(&MemoryStore::new());
        let created = storage.save(input("Write report"));

        let mut edit = TaskInput::from(created.clone());
        edit.title = "Write report v2".to_string();
        edit.tags = vec!["work".to_string(), "work".to_string()];
        let updated = storage.save(edit);

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > updated.created_at);

        let stored = storage.get_by_id(&created.id).unwrap();
        assert_eq!(stored.title, "Write report v2");
        assert_eq!(stored.tags, vec!["work", "work"]);
        assert_eq!(storage.load_all().len(), 1);
    }

    #[test]
    fn test_update_keeps_position_in_list() {
        let storage = setup(&MemoryStore::new());
        let first = storage.save(input("First task"));
        storage.save(input("Second task"));

        let mut edit = TaskInput::from(first.clone());
        edit.title = "First task edited".to_string();
        storage.save(edit);

        assert_eq!(storage.load_all()[0].id, first.id);
    }

    #[test]
    fn test_save_with_unknown_id_creates_new_task() {
        let storage = setup(&MemoryStore::new());
        let mut unknown = input("Orphan edit");
        unknown.id = Some("missing".to_string());

        let created = storage.save(unknown);
        assert_ne!(created.id, "missing");
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(storage.load_all().len(), 1);
    }

    #[test]
    fn test_delete_missing_id_changes_nothing() {
        let storage = setup(&MemoryStore::new());
        storage.save(input("Keep me around"));
        let before = storage.load_all();

        assert!(!storage.delete("missing"));
        assert_eq!(storage.load_all(), before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let storage = setup(&MemoryStore::new());
        let a = storage.save(input("Task alpha"));
        let b = storage.save(input("Task bravo"));
        let c = storage.save(input("Task charlie"));

        assert!(storage.delete(&b.id));
        assert_eq!(storage.load_all(), vec![a, c]);
        assert!(storage.get_by_id(&b.id).is_none());
    }

    #[test]
    fn test_reload_restores_equal_collection() {
        let backend = MemoryStore::new();
        let storage = setup(&backend);
        let mut with_subs = input("Plan sprint");
        with_subs.sub_tasks = vec![storage.create_sub_task("Collect stories")];
        with_subs.priority = Priority::High;
        storage.save(with_subs);
        storage.save(input("Book rooms"));

        let reloaded = setup(&backend);
        assert_eq!(reloaded.load_all(), storage.load_all());
    }

    #[test]
    fn test_every_mutation_is_flushed() {
        let backend = MemoryStore::new();
        let storage = setup(&backend);
        let task = storage.save(input("Flush check"));

        let raw = backend.get(TASKS_KEY).unwrap().unwrap();
        let stored: Vec<Task> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![task.clone()]);

        storage.delete(&task.id);
        assert_eq!(backend.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_tasks_fall_back_to_empty() {
        let backend = MemoryStore::new();
        backend.set(TASKS_KEY, "{not json").unwrap();

        let storage = setup(&backend);
        assert!(storage.load_all().is_empty());

        storage.save(input("Fresh start"));
        assert_eq!(setup(&backend).load_all().len(), 1);
    }

    #[test]
    fn test_draft_roundtrip_and_clear() {
        let storage = setup(&MemoryStore::new());
        assert_eq!(storage.get_draft(), None);

        let draft = TaskDraft {
            title: Some("Half written".to_string()),
            tags: Some(vec!["idea".to_string()]),
            ..Default::default()
        };
        storage.save_draft(&draft);
        assert_eq!(storage.get_draft(), Some(draft));

        storage.clear_draft();
        assert_eq!(storage.get_draft(), None);
    }

    #[test]
    fn test_unreadable_draft_is_absent() {
        let backend = MemoryStore::new();
        backend.set(DRAFT_KEY, "[1, 2").unwrap();
        assert_eq!(setup(&backend).get_draft(), None);
    }

    #[test]
    fn test_create_sub_task() {
        let storage = setup(&MemoryStore::new());
        let sub = storage.create_sub_task("");
        assert!(sub.content.is_empty());
        assert!(!sub.completed);
        assert_ne!(sub.id, storage.create_sub_task("").id);
    }

    #[test]
    fn test_bad_record_is_skipped_and_others_survive() {
        let backend = MemoryStore::new();
        let raw = r#"[
            {"id":"good","title":"Valid task","description":"","priority":"high",
             "subTasks":[],"tags":[],"createdAt":"2024-05-01T09:30:00Z",
             "updatedAt":"2024-05-01T09:30:00Z"},
            {"id":"sparse","title":"No description",
             "createdAt":"2024-05-01T09:30:00Z","updatedAt":"2024-05-01T09:30:00Z"},
            {"title":"Missing id and timestamps"}
        ]"#;
        backend.set(TASKS_KEY, raw).unwrap();

        let storage = setup(&backend);
        let ids: Vec<String> = storage.load_all().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["good", "sparse"]);

        storage.save(input("Added later"));
        let reloaded = setup(&backend).load_all();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded[0].id, "good");
        assert_eq!(reloaded[1].priority, Priority::Medium);
    }

    #[test]
    fn test_flush_failure_keeps_in_memory_change() {
        let backend = Arc::new(FailingStore::default());
        let storage = setup_failing(&backend);
        backend.fail_writes.store(true, Ordering::SeqCst);

        let created = storage.save(input("Unsaved task"));
        assert_eq!(storage.get_by_id(&created.id), Some(created.clone()));
        assert_eq!(backend.inner.get(TASKS_KEY).unwrap(), None);

        assert!(storage.delete(&created.id));
        assert!(storage.load_all().is_empty());
    }

    #[test]
    fn test_read_error_at_startup_gives_empty_list() {
        let backend = Arc::new(FailingStore::default());
        backend.inner.set(TASKS_KEY, "[]").unwrap();
        backend.fail_reads.store(true, Ordering::SeqCst);

        let storage = setup_failing(&backend);
        assert!(storage.load_all().is_empty());
    }

    #[test]
    fn test_draft_backend_errors_do_not_panic() {
        let backend = Arc::new(FailingStore::default());
        let storage = setup_failing(&backend);
        let draft = TaskDraft {
            title: Some("Kept draft".to_string()),
            ..Default::default()
        };
        storage.save_draft(&draft);

        backend.fail_reads.store(true, Ordering::SeqCst);
        assert_eq!(storage.get_draft(), None);

        backend.fail_reads.store(false, Ordering::SeqCst);
        backend.fail_removes.store(true, Ordering::SeqCst);
        storage.clear_draft();
        assert_eq!(storage.get_draft(), Some(draft));

        backend.fail_writes.store(true, Ordering::SeqCst);
        storage.save_draft(&TaskDraft::default());
        assert_eq!(storage.get_draft().and_then(|d| d.title).as_deref(), Some("Kept draft"));
    }
}
