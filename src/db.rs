//! In-memory task collection and shell-side helpers.
//!
//! `Database` is the state container owned by the shell: it holds the collection,
//! swaps in the values returned by the pure operations in [`crate::ops`], and goes
//! through a [`KeyValueStore`] for persistence. The free functions below turn raw
//! text input into typed values and format tasks for the terminal.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fields::format_priority;
use crate::ops::delete_task;
use crate::status::{days_remaining_on, status_on};
use crate::storage::{load_tasks, save_tasks, KeyValueStore};
use crate::task::{Task, TaskId};

/// The current user's task collection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Database {
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load from storage, seeding demo data when nothing usable is stored.
    pub fn load(store: &mut dyn KeyValueStore) -> Self {
        Database {
            tasks: load_tasks(store),
        }
    }

    /// Replace the stored collection with this one.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        save_tasks(store, &self.tasks)
    }

    /// Get a task by ID.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Add a new task; IDs must stay unique.
    pub fn insert(&mut self, task: Task) -> Result<&Task> {
        if self.get(&task.id).is_some() {
            return Err(Error::DuplicateId(task.id.to_string()));
        }
        debug!(task = %task.id, "inserted task");
        self.tasks.push(task);
        let last = self.tasks.len() - 1;
        Ok(&self.tasks[last])
    }

    /// Replace the task `id` with the result of `op` applied to it.
    pub fn update<F>(&mut self, id: &TaskId, op: F) -> Result<&Task>
    where
        F: FnOnce(&Task) -> Result<Task>,
    {
        let idx = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let updated = op(&self.tasks[idx])?;
        debug!(task = %id, "updated task");
        self.tasks[idx] = updated;
        Ok(&self.tasks[idx])
    }

    /// Remove a task, returning it.
    pub fn remove(&mut self, id: &TaskId) -> Result<Task> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.tasks = delete_task(&self.tasks, id)?;
        debug!(task = %id, "removed task");
        Ok(removed)
    }
}

/// Resolve a task identifier (either ID or title) to a task ID.
/// Titles match case-insensitively; several matches are an error.
pub fn resolve_task_identifier(identifier: &str, db: &Database) -> Result<TaskId> {
    let id = TaskId::from(identifier.trim());
    if db.get(&id).is_some() {
        return Ok(id);
    }

    let wanted = identifier.trim().to_lowercase();
    let matches: Vec<&Task> = db
        .tasks
        .iter()
        .filter(|task| task.title.to_lowercase() == wanted)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::NotFound(identifier.to_string())),
        [one] => Ok(one.id.clone()),
        many => Err(Error::AmbiguousTask {
            title: identifier.to_string(),
            ids: many
                .iter()
                .map(|t| t.id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next friday", "this sat", etc.
/// - "end of week", "end of month"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return offset_days(today, 1),
        "yesterday" => return offset_days(today, -1),
        "end of week" | "eow" => {
            let to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return offset_days(today, to_sunday);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return offset_days(first_of_next, -1);
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return offset_days(today, days);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return offset_days(today, weeks.checked_mul(7)?);
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;
        if s == day_name || s == format!("this {day_name}") {
            return offset_days(today, days_ahead);
        }
        if s == format!("next {day_name}") {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return offset_days(today, days_to_add);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// `date` shifted by `days`, or `None` when the result leaves the supported range.
fn offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

/// Turn deadline input into an instant.
///
/// RFC 3339 timestamps are taken as-is; anything [`parse_due_input`] understands
/// becomes the last second of that local day.
pub fn parse_deadline(s: &str, today: NaiveDate) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = parse_due_input(s, today)
        .ok_or_else(|| Error::validation(format!("unrecognised date '{s}'")))?;
    end_of_local_day(date)
}

/// Last second of `date` in local time.
pub fn end_of_local_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    NaiveTime::from_hms_opt(23, 59, 59)
        .and_then(|t| Local.from_local_datetime(&date.and_time(t)).latest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::validation(format!("{date} has no valid local end of day")))
}

/// Format remaining days ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(days: i64) -> String {
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<12} {:<10} {:<10} {:<4} {:<7} {:<12} {}",
        "ID", "Status", "Due", "Ext", "Pri", "Category", "Title"
    );
    for t in tasks {
        let due = format_due_relative(days_remaining_on(t.current_deadline, today));
        let category = t.category.clone().unwrap_or_else(|| "-".into());
        println!(
            "{:<12} {:<10} {:<10} {:<4} {:<7} {:<12} {}",
            truncate(t.id.as_str(), 12),
            status_on(t, today).to_string(),
            due,
            t.extension_count,
            format_priority(t.priority),
            truncate(&category, 12),
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
