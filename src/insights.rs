//! Aggregate views over extension history.

use std::collections::HashMap;

use crate::status::{is_completed_early, is_completed_late, is_completed_on_time};
use crate::task::Task;

/// Label used for extensions recorded without a reason.
pub const UNSPECIFIED_REASON: &str = "Unspecified";

/// Tasks with the most extensions first, ties kept in collection order.
pub fn most_extended(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.extension_count.cmp(&a.extension_count));
    sorted.truncate(limit);
    sorted
}

pub fn average_extensions(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let total: u64 = tasks.iter().map(|t| u64::from(t.extension_count)).sum();
    total as f64 / tasks.len() as f64
}

/// How often each delay reason was given, most common first.
pub fn delay_reasons(tasks: &[Task]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for change in tasks.iter().flat_map(|t| &t.deadline_history) {
        let reason = change.reason.as_deref().unwrap_or(UNSPECIFIED_REASON);
        *counts.entry(reason).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(r, c)| (r.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Completion timing counts. A task can land in both `on_time` and `late`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionTiming {
    pub early: usize,
    pub on_time: usize,
    pub late: usize,
}

pub fn completion_timing(tasks: &[Task]) -> CompletionTiming {
    let mut timing = CompletionTiming::default();
    for t in tasks {
        if is_completed_early(t) {
            timing.early += 1;
        }
        if is_completed_on_time(t) {
            timing.on_time += 1;
        }
        if is_completed_late(t) {
            timing.late += 1;
        }
    }
    timing
}
