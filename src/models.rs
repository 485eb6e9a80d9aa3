//! Task Models
//!
//! Data structures persisted to browser storage. Field names follow the
//! stored JSON layout (camelCase, ISO-8601 timestamps).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fresh opaque identifier for tasks and sub-tasks
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Priority options in display order
pub const PRIORITIES: &[Priority] = &[Priority::Low, Priority::Medium, Priority::High];

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Accepts the lowercase `as_str` form used as the select option value
impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRIORITIES
            .iter()
            .copied()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

/// Checklist entry owned by a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub completed: bool,
}

impl SubTask {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            completed: false,
        }
    }
}

/// A persisted task
///
/// Only the id and timestamps are mandatory when reading stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned on first save, never changes afterwards
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    /// Duplicates are allowed
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn completed_sub_tasks(&self) -> usize {
        self.sub_tasks.iter().filter(|s| s.completed).count()
    }

    /// Fraction of completed sub-tasks, `None` when there are none
    pub fn progress(&self) -> Option<f64> {
        if self.sub_tasks.is_empty() {
            None
        } else {
            Some(self.completed_sub_tasks() as f64 / self.sub_tasks.len() as f64)
        }
    }
}

/// Payload accepted by `TaskStorage::save`
///
/// `id: None` (or an id with no stored match) creates a new task.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskInput {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub sub_tasks: Vec<SubTask>,
    pub tags: Vec<String>,
}

impl From<Task> for TaskInput {
    fn from(task: Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title,
            description: task.description,
            priority: task.priority,
            sub_tasks: task.sub_tasks,
            tags: task.tags,
        }
    }
}

/// Unvalidated snapshot of in-progress form state
///
/// Every field is optional and unknown keys are ignored, so any JSON object
/// written by an older build still parses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub sub_tasks: Option<Vec<SubTask>>,
    pub tags: Option<Vec<String>>,
}
