//! Derived deadline status, list ordering and summary counts.
//!
//! Day arithmetic works on local calendar dates, so a task due today reports zero days
//! remaining whatever the time of day.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::fields::{DeadlineStatus, ListFilter};
use crate::task::Task;

/// Tasks due within this many days (inclusive) are "due soon".
pub const DUE_SOON_DAYS: i64 = 3;

/// Local calendar date of an instant.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `today` until the deadline's local date. Negative when overdue.
pub fn days_remaining_on(deadline: DateTime<Utc>, today: NaiveDate) -> i64 {
    (local_date(deadline) - today).num_days()
}

pub fn days_remaining(deadline: DateTime<Utc>) -> i64 {
    days_remaining_on(deadline, today())
}

/// Classify a task. Exactly one status holds for every task.
pub fn status_on(task: &Task, today: NaiveDate) -> DeadlineStatus {
    if task.is_completed() {
        return DeadlineStatus::Completed;
    }
    let days = days_remaining_on(task.current_deadline, today);
    if days < 0 {
        DeadlineStatus::Overdue
    } else if days <= DUE_SOON_DAYS {
        DeadlineStatus::DueSoon
    } else {
        DeadlineStatus::OnTrack
    }
}

pub fn status(task: &Task) -> DeadlineStatus {
    status_on(task, today())
}

/// Completed before the original deadline.
pub fn is_completed_early(task: &Task) -> bool {
    task.completed_at
        .is_some_and(|done| done < task.original_deadline)
}

/// Completed inside the window between the original and the current deadline.
///
/// Overlaps with [`is_completed_late`] when the deadline was extended and the task
/// was finished after the original deadline but before the current one.
pub fn is_completed_on_time(task: &Task) -> bool {
    task.completed_at
        .is_some_and(|done| done >= task.original_deadline && done <= task.current_deadline)
}

/// Completed after the original deadline.
pub fn is_completed_late(task: &Task) -> bool {
    task.completed_at
        .is_some_and(|done| done > task.original_deadline)
}

/// Order tasks for a list: overdue first, then by current deadline.
pub fn sort_for_display(tasks: &mut [&Task], today: NaiveDate) {
    tasks.sort_by_key(|t| {
        (
            status_on(t, today) != DeadlineStatus::Overdue,
            t.current_deadline,
        )
    });
}

/// Select the tasks a list view shows, in display order.
pub fn filter_tasks(tasks: &[Task], filter: ListFilter, today: NaiveDate) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| match filter {
            ListFilter::All => true,
            ListFilter::Active => !t.is_completed(),
            ListFilter::Completed => t.is_completed(),
        })
        .collect();
    sort_for_display(&mut out, today);
    out
}

/// Headline counts for a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn summarize(tasks: &[Task], today: NaiveDate) -> Summary {
    tasks.iter().fold(Summary::default(), |mut s, t| {
        match status_on(t, today) {
            DeadlineStatus::Completed => s.completed += 1,
            DeadlineStatus::Overdue => {
                s.pending += 1;
                s.overdue += 1;
            }
            DeadlineStatus::DueSoon | DeadlineStatus::OnTrack => s.pending += 1,
        }
        s
    })
}
