mod collection;
mod config;
pub mod database;
mod memory;

pub use collection::{Collection, Loaded, Record, STUDY_SESSIONS, STUDY_TASKS, TASK_UPDATES};
pub use config::{Config, LoggingConfig, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StoreError;

/// String-keyed, string-valued persistence.
///
/// Each key holds a whole collection; `set` replaces it in one write.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Returns the Planora data directory, creating it if needed.
///
/// `PLANORA_DATA_DIR` wins when set. Otherwise `~/.config/planora/`, or
/// `~/.config/planora-dev/` when `PLANORA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("PLANORA_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PLANORA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("planora-dev")
            } else {
                base_dir.join("planora")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
