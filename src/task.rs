//! Task data structure and its deadline history.
//!
//! A task carries two deadlines: the original one, fixed at creation and used as the
//! baseline for lateness, and the current one, which moves every time the deadline is
//! extended. Each extension is kept as a [`DeadlineChange`] in `deadline_history`.
//!
//! Field names are serialized in camelCase with RFC 3339 timestamps so the stored
//! payload stays readable by other front-ends sharing the same storage entry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;

/// Opaque task identifier, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        TaskId(format!("task-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded deadline change. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineChange {
    pub previous_deadline: DateTime<Utc>,
    pub new_deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// A tracked piece of work with a movable deadline.
///
/// Values are treated as immutable snapshots: the functions in [`crate::ops`] return
/// updated copies instead of editing a task in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub original_deadline: DateTime<Utc>,
    pub current_deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extension_count: u32,
    #[serde(default)]
    pub deadline_history: Vec<DeadlineChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Input for creating a task, already converted to typed values by the caller.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub original_deadline: DateTime<Utc>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub link: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, original_deadline: DateTime<Utc>) -> Self {
        NewTask {
            title: title.into(),
            original_deadline,
            category: None,
            priority: None,
            link: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// The deadline the current one would be if history were the only source of truth.
    pub fn expected_current_deadline(&self) -> DateTime<Utc> {
        self.deadline_history
            .last()
            .map(|c| c.new_deadline)
            .unwrap_or(self.original_deadline)
    }

    /// Whether the redundant fields agree with the history.
    pub fn is_consistent(&self) -> bool {
        self.extension_count as usize == self.deadline_history.len()
            && self.current_deadline == self.expected_current_deadline()
    }

    /// Return a copy whose `extension_count` and `current_deadline` are recomputed from
    /// the history.
    pub fn normalized(&self) -> Task {
        Task {
            extension_count: self.deadline_history.len() as u32,
            current_deadline: self.expected_current_deadline(),
            ..self.clone()
        }
    }
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
