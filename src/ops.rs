//! Domain operations on tasks.
//!
//! Every function here is pure: it takes tasks by reference and returns new values.
//! Nothing touches storage; persisting the result is the caller's job. The `_at`
//! variants take the current instant explicitly, the plain variants use `Utc::now()`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{non_blank, DeadlineChange, NewTask, Task, TaskId};

/// Create a task whose current deadline starts at the original one.
pub fn create_task(input: NewTask) -> Result<Task> {
    create_task_at(input, Utc::now())
}

pub fn create_task_at(input: NewTask, now: DateTime<Utc>) -> Result<Task> {
    let title = validate_title(&input.title)?;
    Ok(Task {
        id: TaskId::generate(),
        title,
        original_deadline: input.original_deadline,
        current_deadline: input.original_deadline,
        category: non_blank(input.category),
        priority: input.priority,
        created_at: now,
        completed_at: None,
        extension_count: 0,
        deadline_history: Vec::new(),
        link: non_blank(input.link),
    })
}

/// Move the current deadline and record the change.
///
/// A deadline earlier than the current one is accepted and recorded the same way.
/// Completed tasks can be extended and stay completed.
pub fn extend_deadline(task: &Task, new_deadline: DateTime<Utc>, reason: Option<String>) -> Task {
    extend_deadline_at(task, new_deadline, reason, Utc::now())
}

pub fn extend_deadline_at(
    task: &Task,
    new_deadline: DateTime<Utc>,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Task {
    if new_deadline < task.current_deadline {
        debug!(task = %task.id, "deadline moved earlier");
    }
    let change = DeadlineChange {
        previous_deadline: task.current_deadline,
        new_deadline,
        reason: non_blank(reason),
        changed_at: now,
    };
    let mut deadline_history = task.deadline_history.clone();
    deadline_history.push(change);
    Task {
        current_deadline: new_deadline,
        extension_count: task.extension_count + 1,
        deadline_history,
        ..task.clone()
    }
}

/// Push the current deadline by a number of days.
///
/// Fails with [`Error::Validation`] when the resulting deadline is out of range.
pub fn extend_by_days(task: &Task, days: i64, reason: Option<String>) -> Result<Task> {
    extend_by_days_at(task, days, reason, Utc::now())
}

pub fn extend_by_days_at(
    task: &Task,
    days: i64,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<Task> {
    let new_deadline = Duration::try_days(days)
        .and_then(|d| task.current_deadline.checked_add_signed(d))
        .ok_or_else(|| Error::validation(format!("cannot move deadline by {days} days")))?;
    Ok(extend_deadline_at(task, new_deadline, reason, now))
}

/// Mark a task completed. Re-completing overwrites the timestamp.
pub fn complete_task(task: &Task, completed_at: Option<DateTime<Utc>>) -> Task {
    Task {
        completed_at: Some(completed_at.unwrap_or_else(Utc::now)),
        ..task.clone()
    }
}

/// Mark a task active again. The deadline history is left alone.
pub fn reopen_task(task: &Task) -> Task {
    Task {
        completed_at: None,
        ..task.clone()
    }
}

/// Complete an active task or reopen a completed one.
pub fn toggle_completion(task: &Task) -> Task {
    toggle_completion_at(task, Utc::now())
}

pub fn toggle_completion_at(task: &Task, now: DateTime<Utc>) -> Task {
    if task.is_completed() {
        reopen_task(task)
    } else {
        complete_task(task, Some(now))
    }
}

/// Change a task's title.
pub fn rename_task(task: &Task, title: &str) -> Result<Task> {
    let title = validate_title(title)?;
    Ok(Task {
        title,
        ..task.clone()
    })
}

/// Return the collection without the task `id`.
pub fn delete_task(tasks: &[Task], id: &TaskId) -> Result<Vec<Task>> {
    if !tasks.iter().any(|t| &t.id == id) {
        return Err(Error::NotFound(id.to_string()));
    }
    Ok(tasks.iter().filter(|t| &t.id != id).cloned().collect())
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("task title cannot be empty"));
    }
    Ok(title.to_string())
}
