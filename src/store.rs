//! Reactive Task Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Views subscribe to
//! `tasks()`; every mutation goes through the helpers below while holding a
//! single write guard, so readers never see a half-applied change.

use reactive_stores::Store;
use leptos::prelude::*;

use crate::models::Task;

/// Tasks in creation order
#[derive(Clone, Debug, Default, Store)]
pub struct TaskState {
    pub tasks: Vec<Task>,
}

/// Type alias for the store
pub type TaskStore = Store<TaskState>;

// ========================
// Store Helper Functions
// ========================

/// Append a newly created task
pub fn store_push_task(store: &TaskStore, task: Task) {
    store.tasks().write().push(task);
}

/// Replace a task by ID, returns false when no task matched
pub fn store_replace_task(store: &TaskStore, updated: Task) -> bool {
    let field = store.tasks();
    let mut tasks = field.write();
    match tasks.iter_mut().find(|task| task.id == updated.id) {
        Some(task) => {
            *task = updated;
            true
        }
        None => false,
    }
}

/// Remove a task by ID, returns false when no task matched
pub fn store_remove_task(store: &TaskStore, task_id: &str) -> bool {
    let field = store.tasks();
    let mut tasks = field.write();
    let before = tasks.len();
    tasks.retain(|task| task.id != task_id);
    tasks.len() != before
}

/// Find a task by ID without tracking
pub fn store_find_task(store: &TaskStore, task_id: &str) -> Option<Task> {
    store
        .tasks()
        .with_untracked(|tasks| tasks.iter().find(|task| task.id == task_id).cloned())
}
