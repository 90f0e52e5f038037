//! Persistence adapter for the task collection.
//!
//! The whole collection lives in a single key-value entry as a JSON array. The key
//! carries a schema version; a future format change bumps the key instead of rewriting
//! old payloads in place.
//!
//! Loading never fails: missing or unreadable data is replaced by a small seed set,
//! which is written back so the next load is stable. An unreadable payload is first
//! copied to [`BACKUP_KEY`], so reseeding never destroys the only copy. Saving does
//! fail loudly, since a lost write means lost user data.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::fields::Priority;
use crate::ops::{complete_task, create_task_at, extend_by_days_at};
use crate::task::{NewTask, Task, TaskId};

/// Version of the stored payload layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Storage entry holding the task collection.
pub const STORAGE_KEY: &str = "soft-deadline-manager:v1";

/// Last payload that failed to load, kept before the seed set replaces it.
pub const BACKUP_KEY: &str = "soft-deadline-manager:v1:corrupt";

/// A string-to-string store with whole-value replacement.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, used by tests and by shells without a filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`; `soft-deadline-manager:v1` maps to `soft-deadline-manager.v1.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '.' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("reading {}: {e}", path.display()))),
        }
    }

    /// Atomic-ish write via temp + rename.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let tmp = path.with_extension("json.tmp");
            let mut f = File::create(&tmp)?;
            f.write_all(value.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|e| Error::Storage(format!("writing {}: {e}", path.display())))
    }
}

/// Read the stored collection. `Ok(None)` when nothing has been stored yet.
///
/// Duplicate ids and blank titles make the whole payload corrupt. Tasks whose
/// extension count or current deadline disagree with their history are repaired.
pub fn try_load_tasks(store: &dyn KeyValueStore) -> Result<Option<Vec<Task>>> {
    let Some(raw) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let tasks: Vec<Task> = serde_json::from_str(&raw)?;

    let mut seen = HashSet::new();
    if let Some(dup) = tasks.iter().find(|t| !seen.insert(&t.id)) {
        return Err(Error::DuplicateId(dup.id.to_string()));
    }
    if let Some(blank) = tasks.iter().find(|t| t.title.trim().is_empty()) {
        return Err(Error::validation(format!("task {} has an empty title", blank.id)));
    }

    let tasks = tasks
        .into_iter()
        .map(|t| {
            if t.is_consistent() {
                t
            } else {
                warn!(task = %t.id, "repairing extension count and current deadline from history");
                t.normalized()
            }
        })
        .collect();
    Ok(Some(tasks))
}

/// Load the collection, falling back to the seed set on missing or corrupt data.
pub fn load_tasks(store: &mut dyn KeyValueStore) -> Vec<Task> {
    match try_load_tasks(store) {
        Ok(Some(tasks)) => {
            debug!(count = tasks.len(), "loaded tasks");
            tasks
        }
        Ok(None) => {
            debug!("no stored tasks, seeding demo data");
            reseed(store)
        }
        Err(e) => {
            back_up_payload(store);
            warn!(error = %e, backup = BACKUP_KEY, "stored tasks unreadable, seeding demo data");
            reseed(store)
        }
    }
}

/// Copy the current payload to [`BACKUP_KEY`], logging how many entries it held.
fn back_up_payload(store: &mut dyn KeyValueStore) {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "could not read stored tasks for backup");
            return;
        }
    };
    let entries = serde_json::from_str::<serde_json::Value>(&raw)
        .ok()
        .and_then(|v| v.as_array().map(Vec::len));
    match store.set(BACKUP_KEY, &raw) {
        Ok(()) => warn!(?entries, bytes = raw.len(), backup = BACKUP_KEY, "discarding stored tasks"),
        Err(e) => warn!(error = %e, ?entries, "could not back up stored tasks"),
    }
}

fn reseed(store: &mut dyn KeyValueStore) -> Vec<Task> {
    let seed = seed_tasks(Utc::now());
    if let Err(e) = save_tasks(store, &seed) {
        warn!(error = %e, "could not persist seed data");
    }
    seed
}

/// Replace the stored collection.
pub fn save_tasks(store: &mut dyn KeyValueStore, tasks: &[Task]) -> Result<()> {
    let data = serde_json::to_string_pretty(tasks)?;
    store.set(STORAGE_KEY, &data)?;
    debug!(count = tasks.len(), "saved tasks");
    Ok(())
}

/// Demonstration tasks shown on first run.
pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let days = Duration::days;
    let seed = |id: &str, input: NewTask| -> Option<Task> {
        let mut t = create_task_at(input, now).ok()?;
        t.id = TaskId::from(id);
        Some(t)
    };

    let spec = seed(
        "task-1",
        NewTask::new("Write project spec", now + days(3))
            .category("Work")
            .priority(Priority::High)
            .link("https://example.com/project"),
    );
    let slides = seed(
        "task-2",
        NewTask::new("Prepare slides", now + days(1))
            .category("Meetings")
            .priority(Priority::Medium),
    )
    .and_then(|t| extend_by_days_at(&t, 2, Some("Underestimated effort".into()), now).ok());
    let docs = seed(
        "task-3",
        NewTask::new("Update documentation", now - days(2))
            .category("Study")
            .priority(Priority::Low)
            .link("https://docs.example.com"),
    )
    .map(|t| complete_task(&t, Some(now - days(3))));
    let gym = seed(
        "task-4",
        NewTask::new("Gym workout session", now)
            .category("Health")
            .priority(Priority::Low),
    );

    [spec, slides, docs, gym].into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{create_task, extend_deadline};
    use chrono::TimeZone;

    fn sample() -> Vec<Task> {
        let d = Utc.with_ymd_and_hms(2026, 7, 1, 17, 0, 0).unwrap();
        let a = create_task(NewTask::new("Write spec", d).category("Work")).unwrap();
        let a = extend_deadline(&a, d + Duration::days(2), Some("Low energy".into()));
        let b = complete_task(&create_task(NewTask::new("Call bank", d)).unwrap(), None);
        vec![a, b]
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryStore::new();
        let tasks = sample();
        save_tasks(&mut store, &tasks).unwrap();
        assert_eq!(load_tasks(&mut store), tasks);
    }

    #[test]
    fn missing_entry_seeds_and_persists() {
        let mut store = MemoryStore::new();
        let first = load_tasks(&mut store);
        assert!(!first.is_empty());
        assert!(store.get(STORAGE_KEY).unwrap().is_some());
        assert_eq!(load_tasks(&mut store), first);
    }

    #[test]
    fn corrupt_entry_falls_back_to_seed() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(try_load_tasks(&store).is_err());

        let tasks = load_tasks(&mut store);
        assert_eq!(tasks.len(), seed_tasks(Utc::now()).len());
        assert!(try_load_tasks(&store).unwrap().is_some());
    }

    #[test]
    fn duplicate_ids_are_corrupt() {
        let mut store = MemoryStore::new();
        let t = sample().remove(0);
        save_tasks(&mut store, &[t.clone(), t]).unwrap();
        assert!(matches!(try_load_tasks(&store), Err(Error::DuplicateId(_))));
    }

    #[test]
    fn corrupt_payload_is_backed_up_before_reseeding() {
        let mut store = MemoryStore::new();
        let t = sample().remove(0);
        save_tasks(&mut store, &[t.clone(), t]).unwrap();
        let original = store.get(STORAGE_KEY).unwrap().unwrap();

        let tasks = load_tasks(&mut store);
        assert_eq!(tasks.len(), 4);
        assert_eq!(store.get(BACKUP_KEY).unwrap(), Some(original));
    }

    #[test]
    fn missing_entry_leaves_no_backup() {
        let mut store = MemoryStore::new();
        load_tasks(&mut store);
        assert!(store.get(BACKUP_KEY).unwrap().is_none());
    }

    #[test]
    fn blank_titles_are_corrupt() {
        let mut store = MemoryStore::new();
        let mut t = sample().remove(0);
        t.title = "  ".into();
        save_tasks(&mut store, &[t]).unwrap();
        assert!(matches!(try_load_tasks(&store), Err(Error::Validation(_))));

        load_tasks(&mut store);
        assert!(store.get(BACKUP_KEY).unwrap().is_some());
    }

    #[test]
    fn inconsistent_tasks_are_repaired_on_load() {
        let mut store = MemoryStore::new();
        let mut t = sample().remove(0);
        t.current_deadline = t.original_deadline;
        t.extension_count = 5;
        save_tasks(&mut store, &[t.clone()]).unwrap();

        let loaded = try_load_tasks(&store).unwrap().unwrap();
        assert_eq!(loaded[0].extension_count, 1);
        assert_eq!(loaded[0].current_deadline, t.deadline_history[0].new_deadline);
    }

    #[test]
    fn seed_tasks_hold_invariants() {
        let tasks = seed_tasks(Utc::now());
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(Task::is_consistent));
        let slides = &tasks[1];
        assert_eq!(slides.extension_count, 1);
        assert_eq!(
            slides.deadline_history[0].reason.as_deref(),
            Some("Underestimated effort")
        );
        assert!(tasks[2].is_completed());
    }

    #[test]
    fn file_store_maps_key_to_file_name() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for(STORAGE_KEY),
            PathBuf::from("/data/soft-deadline-manager.v1.json")
        );
    }

    #[test]
    fn storage_key_tracks_schema_version() {
        assert!(STORAGE_KEY.ends_with(&format!(":v{SCHEMA_VERSION}")));
    }
}
