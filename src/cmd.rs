//! Command implementations for the CLI interface.
//!
//! Each handler resolves its arguments into typed values, applies one domain
//! operation to the in-memory [`Database`], and saves the whole collection back.

use chrono::NaiveDate;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::config::{Config, MAX_EXTEND_DAYS, MIN_EXTEND_DAYS};
use crate::db::*;
use crate::error::{Error, Result};
use crate::fields::*;
use crate::insights::{average_extensions, completion_timing, delay_reasons, most_extended};
use crate::ops;
use crate::status::{days_remaining_on, filter_tasks, status_on, summarize};
use crate::storage::KeyValueStore;
use crate::task::NewTask;

/// Number of tasks shown under "most extensions".
const INSIGHT_TOP: usize = 5;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Due date: YYYY-MM-DD, RFC 3339, "today", "tomorrow", "friday" or "in Nd".
        #[arg(long)]
        due: String,
        /// Free-text category.
        #[arg(long)]
        category: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Related link (URL).
        #[arg(long)]
        link: Option<String>,
    },

    /// List tasks, overdue first.
    List {
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t = ListFilter::All)]
        filter: ListFilter,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task and its deadline history.
    View {
        /// Task ID or title.
        id: String,
    },

    /// Move a task's deadline and record why.
    Extend {
        /// Task ID or title.
        id: String,
        /// New deadline.
        #[arg(long, conflicts_with = "days")]
        to: Option<String>,
        /// Days to add to the current deadline.
        #[arg(long, value_parser = clap::value_parser!(i64).range(MIN_EXTEND_DAYS..=MAX_EXTEND_DAYS))]
        days: Option<i64>,
        /// Why the deadline moved.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Mark a task completed.
    Complete {
        /// Task ID or title.
        id: String,
        /// Completion time (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },

    /// Mark a completed task active again.
    Reopen {
        /// Task ID or title.
        id: String,
    },

    /// Complete an active task or reopen a completed one.
    Toggle {
        /// Task ID or title.
        id: String,
    },

    /// Change a task's title.
    Rename {
        /// Task ID or title.
        id: String,
        /// New title.
        title: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID or title.
        id: String,
    },

    /// Show completed, pending and overdue counts.
    Stats,

    /// Show extension insights.
    Insights,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task to the database.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    store: &mut dyn KeyValueStore,
    today: NaiveDate,
    title: String,
    due: String,
    category: Option<String>,
    priority: Option<Priority>,
    link: Option<String>,
) -> Result<()> {
    let deadline = parse_deadline(&due, today)?;
    let input = NewTask {
        title,
        original_deadline: deadline,
        category,
        priority,
        link,
    };
    let task = ops::create_task(input)?;
    let id = db.insert(task)?.id.clone();
    db.save(store)?;
    println!("Added task {id}");
    Ok(())
}

/// List tasks with the given filter.
pub fn cmd_list(db: &Database, today: NaiveDate, filter: ListFilter, limit: Option<usize>) {
    let mut tasks = filter_tasks(&db.tasks, filter, today);
    if let Some(n) = limit {
        tasks.truncate(n);
    }
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&tasks, today);
}

/// View detailed information about a specific task.
pub fn cmd_view(db: &Database, today: NaiveDate, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let task = db
        .get(&task_id)
        .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
    let days = days_remaining_on(task.current_deadline, today);

    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", status_on(task, today));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Category:     {}", task.category.as_deref().unwrap_or("-"));
    println!("Link:         {}", task.link.as_deref().unwrap_or("-"));
    println!("Original:     {}", task.original_deadline.to_rfc3339());
    println!("Due:          {} ({})", task.current_deadline.to_rfc3339(), format_due_relative(days));
    println!("Created:      {}", task.created_at.to_rfc3339());
    println!(
        "Completed:    {}",
        task.completed_at.map(|d| d.to_rfc3339()).unwrap_or_else(|| "-".into())
    );
    println!("Extensions:   {}", task.extension_count);
    for (i, change) in task.deadline_history.iter().enumerate() {
        println!(
            "  {}. {} -> {} ({}) on {}",
            i + 1,
            change.previous_deadline.date_naive(),
            change.new_deadline.date_naive(),
            change.reason.as_deref().unwrap_or("no reason"),
            change.changed_at.to_rfc3339()
        );
    }
    Ok(())
}

/// Extend a task's deadline to a date or by a number of days.
#[allow(clippy::too_many_arguments)]
pub fn cmd_extend(
    db: &mut Database,
    store: &mut dyn KeyValueStore,
    config: &Config,
    today: NaiveDate,
    id: String,
    to: Option<String>,
    days: Option<i64>,
    reason: Option<String>,
) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let updated = match to {
        Some(when) => {
            let deadline = parse_deadline(&when, today)?;
            db.update(&task_id, |t| Ok(ops::extend_deadline(t, deadline, reason)))?
        }
        None => {
            let days = days.unwrap_or(config.default_extend_days);
            db.update(&task_id, |t| ops::extend_by_days(t, days, reason))?
        }
    };
    let line = format!(
        "Extended {} to {} ({} extension(s))",
        updated.id,
        updated.current_deadline.to_rfc3339(),
        updated.extension_count
    );
    db.save(store)?;
    println!("{line}");
    Ok(())
}

/// Mark a task completed.
pub fn cmd_complete(
    db: &mut Database,
    store: &mut dyn KeyValueStore,
    today: NaiveDate,
    id: String,
    at: Option<String>,
) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let completed_at = at.as_deref().map(|s| parse_deadline(s, today)).transpose()?;
    db.update(&task_id, |t| Ok(ops::complete_task(t, completed_at)))?;
    db.save(store)?;
    println!("Completed {task_id}");
    Ok(())
}

/// Reopen a completed task.
pub fn cmd_reopen(db: &mut Database, store: &mut dyn KeyValueStore, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    db.update(&task_id, |t| Ok(ops::reopen_task(t)))?;
    db.save(store)?;
    println!("Reopened {task_id}");
    Ok(())
}

/// Flip a task between completed and active.
pub fn cmd_toggle(db: &mut Database, store: &mut dyn KeyValueStore, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let done = db
        .update(&task_id, |t| Ok(ops::toggle_completion(t)))?
        .is_completed();
    db.save(store)?;
    if done {
        println!("Completed {task_id}");
    } else {
        println!("Reopened {task_id}");
    }
    Ok(())
}

/// Rename a task.
pub fn cmd_rename(
    db: &mut Database,
    store: &mut dyn KeyValueStore,
    id: String,
    title: String,
) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let old = db
        .get(&task_id)
        .map(|t| t.title.clone())
        .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
    let new = db.update(&task_id, |t| ops::rename_task(t, &title))?.title.clone();
    db.save(store)?;
    println!("Renamed \"{old}\" to \"{new}\"");
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(db: &mut Database, store: &mut dyn KeyValueStore, id: String) -> Result<()> {
    let task_id = resolve_task_identifier(&id, db)?;
    let removed = db.remove(&task_id)?;
    db.save(store)?;
    println!("Deleted {} ({})", removed.id, removed.title);
    Ok(())
}

/// Print headline counts.
pub fn cmd_stats(db: &Database, today: NaiveDate) {
    let s = summarize(&db.tasks, today);
    println!("{:<10} {}", "Completed", s.completed);
    println!("{:<10} {}", "Pending", s.pending);
    println!("{:<10} {}", "Overdue", s.overdue);
}

/// Print extension insights.
pub fn cmd_insights(db: &Database) {
    println!("Tasks with most extensions:");
    let top = most_extended(&db.tasks, INSIGHT_TOP);
    if top.is_empty() {
        println!("  -");
    }
    for (i, t) in top.iter().enumerate() {
        println!("  {}. {} ({} extension(s))", i + 1, t.title, t.extension_count);
    }

    println!();
    println!("Average extensions per task: {:.2}", average_extensions(&db.tasks));

    println!();
    println!("Most common delay reasons:");
    let reasons = delay_reasons(&db.tasks);
    if reasons.is_empty() {
        println!("  -");
    }
    for (reason, count) in reasons {
        println!("  {:<24} {}", truncate(&reason, 24), count);
    }

    let timing = completion_timing(&db.tasks);
    println!();
    println!("Completed early:   {}", timing.early);
    println!("Completed on time: {}", timing.on_time);
    println!("Completed late:    {}", timing.late);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
