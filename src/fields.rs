//! Enumerations and field types for deadline tracking.
//!
//! This module defines the structured values attached to a task (priority) and the
//! derived classifications used when listing tasks (status and list filters).

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task priority. Only affects display and sorting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

/// Derived urgency of a task. Computed on demand and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlineStatus {
    Completed,
    Overdue,
    DueSoon,
    OnTrack,
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeadlineStatus::Completed => "completed",
            DeadlineStatus::Overdue => "overdue",
            DeadlineStatus::DueSoon => "due-soon",
            DeadlineStatus::OnTrack => "on-track",
        };
        f.write_str(s)
    }
}

/// Which tasks a list view shows.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    Active,
    Completed,
}

/// Format a priority for display.
pub fn format_priority(p: Option<Priority>) -> &'static str {
    match p {
        Some(Priority::Low) => "Low",
        Some(Priority::Medium) => "Medium",
        Some(Priority::High) => "High",
        None => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_uses_lowercase_names_and_accepts_legacy_case() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(p, Priority::Medium);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&DeadlineStatus::DueSoon).unwrap(), "\"due-soon\"");
        assert_eq!(DeadlineStatus::OnTrack.to_string(), "on-track");
    }
}
