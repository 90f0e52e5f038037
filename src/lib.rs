//! # Soft Deadline Manager
//!
//! A personal deadline tracker. Tasks keep their original deadline forever; every time a
//! deadline moves, the change is appended to the task's history together with an
//! optional reason, so you can see how often and why work slips.
//!
//! ## Layout
//!
//! - [`task`] / [`fields`]: the task entity, its deadline history and enumerations.
//! - [`ops`]: pure create / extend / complete / reopen / rename / delete operations.
//! - [`status`]: derived status (overdue, due-soon, on-track, completed), display order
//!   and completion timing.
//! - [`insights`]: most-extended tasks, average extensions, delay reasons.
//! - [`storage`]: key-value persistence with seed data on first run.
//! - [`db`]: the in-memory collection owned by a front-end, plus input parsing.
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use soft_deadlines::ops::{create_task, extend_deadline};
//! use soft_deadlines::task::NewTask;
//!
//! let due = Utc::now() + Duration::days(3);
//! let task = create_task(NewTask::new("Write spec", due)).unwrap();
//! let later = extend_deadline(&task, due + Duration::days(2), Some("Low energy".into()));
//!
//! assert_eq!(later.original_deadline, due);
//! assert_eq!(later.extension_count, 1);
//! ```
//!
//! The `sdm` binary is a thin command-line front-end over these modules. Data is stored
//! as a single JSON file in the data directory.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod insights;
pub mod ops;
pub mod status;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
