//! Task Form Logic
//!
//! View-independent state for the create/edit form: opening in a fixed mode,
//! list editing, validation, submit, and debounced draft auto-save.

use std::rc::Rc;

use leptos::prelude::*;

use crate::models::{Priority, SubTask, Task, TaskDraft, TaskInput};
use crate::routes::Navigator;
use crate::storage::TaskStorage;
use crate::timers::{Debouncer, Scheduler};
use crate::validators::{validate_sub_task_content, validate_title, ValidationError};

/// Quiet period before a draft is written
pub const DRAFT_DEBOUNCE_MS: u32 = 500;

/// How long the "draft saved" indicator stays visible
pub const SAVED_INDICATOR_MS: u32 = 2_000;

/// Fixed for the lifetime of a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(String),
}

impl FormMode {
    pub fn task_id(&self) -> Option<&str> {
        match self {
            FormMode::Creating => None,
            FormMode::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing(_))
    }
}

/// Current raw field values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskFormValue {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub sub_tasks: Vec<SubTask>,
    pub tags: Vec<String>,
}

impl TaskFormValue {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            sub_tasks: task.sub_tasks.clone(),
            tags: task.tags.clone(),
        }
    }

    pub fn from_draft(draft: TaskDraft) -> Self {
        Self {
            title: draft.title.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            sub_tasks: draft.sub_tasks.unwrap_or_default(),
            tags: draft.tags.unwrap_or_default(),
        }
    }

    pub fn to_draft(&self, mode: &FormMode) -> TaskDraft {
        TaskDraft {
            id: mode.task_id().map(str::to_string),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            priority: Some(self.priority),
            sub_tasks: Some(self.sub_tasks.clone()),
            tags: Some(self.tags.clone()),
        }
    }

    pub fn to_input(&self, mode: &FormMode) -> TaskInput {
        TaskInput {
            id: mode.task_id().map(str::to_string),
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            sub_tasks: self.sub_tasks.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn add_sub_task(&mut self, sub_task: SubTask) {
        self.sub_tasks.push(sub_task);
    }

    /// Later rows shift down by one; out-of-range is a no-op
    pub fn remove_sub_task(&mut self, index: usize) -> bool {
        if index < self.sub_tasks.len() {
            self.sub_tasks.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_sub_task_content(&mut self, index: usize, content: String) {
        if let Some(sub) = self.sub_tasks.get_mut(index) {
            sub.content = content;
        }
    }

    pub fn set_sub_task_completed(&mut self, index: usize, completed: bool) {
        if let Some(sub) = self.sub_tasks.get_mut(index) {
            sub.completed = completed;
        }
    }

    pub fn add_tag(&mut self) {
        self.tags.push(String::new());
    }

    pub fn set_tag(&mut self, index: usize, tag: String) {
        if let Some(slot) = self.tags.get_mut(index) {
            *slot = tag;
        }
    }

    pub fn remove_tag(&mut self, index: usize) -> bool {
        if index < self.tags.len() {
            self.tags.remove(index);
            true
        } else {
            false
        }
    }

    pub fn validate(&self) -> FormErrors {
        FormErrors {
            title: validate_title(&self.title),
            sub_tasks: self
                .sub_tasks
                .iter()
                .map(|sub| validate_sub_task_content(&sub.content))
                .collect(),
        }
    }
}

/// Every triggered rule, per field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormErrors {
    pub title: Vec<ValidationError>,
    /// One entry per sub-task row
    pub sub_tasks: Vec<Vec<ValidationError>>,
}

impl FormErrors {
    pub fn is_valid(&self) -> bool {
        self.title.is_empty() && self.sub_tasks.iter().all(Vec::is_empty)
    }

    pub fn sub_task(&self, index: usize) -> &[ValidationError] {
        self.sub_tasks.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Resolve the form's mode and initial values
///
/// An edit target with no stored task sends the user back to the list and
/// returns `None`. A new form picks up a draft that was not bound to a task.
pub fn open_form(
    target: Option<&str>,
    storage: &TaskStorage,
    navigator: &dyn Navigator,
) -> Option<(FormMode, TaskFormValue)> {
    match target {
        Some(id) => match storage.get_by_id(id) {
            Some(task) => Some((FormMode::Editing(task.id.clone()), TaskFormValue::from_task(&task))),
            None => {
                tracing::warn!(id, "edit target not found, returning to list");
                navigator.to_list();
                None
            }
        },
        None => {
            let value = storage
                .get_draft()
                .filter(|draft| draft.id.is_none())
                .map(TaskFormValue::from_draft)
                .unwrap_or_default();
            Some((FormMode::Creating, value))
        }
    }
}

/// Save a valid form, clear the draft and go back to the list
///
/// Invalid forms are left untouched.
pub fn submit(
    mode: &FormMode,
    value: &TaskFormValue,
    storage: &TaskStorage,
    navigator: &dyn Navigator,
) -> Option<Task> {
    if !value.validate().is_valid() {
        tracing::debug!("submit blocked by validation");
        return None;
    }
    let task = storage.save(value.to_input(mode));
    storage.clear_draft();
    navigator.to_list();
    Some(task)
}

/// Debounced draft writer with a self-clearing "saved" flag
pub struct DraftAutosave<S: Scheduler> {
    storage: TaskStorage,
    save: Debouncer<S>,
    indicator: Rc<Debouncer<S>>,
    saved: RwSignal<bool>,
}

impl<S: Scheduler + Clone + 'static> DraftAutosave<S> {
    pub fn new(storage: TaskStorage, scheduler: S) -> Self {
        Self {
            storage,
            save: Debouncer::new(scheduler.clone(), DRAFT_DEBOUNCE_MS),
            indicator: Rc::new(Debouncer::new(scheduler, SAVED_INDICATOR_MS)),
            saved: RwSignal::new(false),
        }
    }

    /// Restart the quiet period with the latest form snapshot
    pub fn schedule(&self, draft: TaskDraft) {
        let storage = self.storage.clone();
        let indicator = Rc::clone(&self.indicator);
        let saved = self.saved;
        self.save.trigger(move || {
            storage.save_draft(&draft);
            saved.set(true);
            indicator.trigger(move || saved.set(false));
        });
    }

    /// Drop both pending timers
    pub fn cancel(&self) {
        self.save.cancel();
        self.indicator.cancel();
    }

    pub fn saved(&self) -> ReadSignal<bool> {
        self.saved.read_only()
    }
}
