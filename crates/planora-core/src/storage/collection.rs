//! Typed views over the JSON arrays kept in a [`KeyValueStore`].
//!
//! Decoding is per element: one bad record does not cost the rest of the
//! collection. A value that is missing, unreadable, or not a JSON array loads
//! as empty.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;
use crate::error::{StoreError, ValidationError};

pub const STUDY_TASKS: &str = "studyTasks";
pub const STUDY_SESSIONS: &str = "studySessions";
pub const TASK_UPDATES: &str = "taskUpdates";

/// A record that can live in a collection.
pub trait Record: Serialize + DeserializeOwned {
    /// Shape checks serde cannot express. Failing records are dropped on load.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Result of reading a collection.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Raw elements that failed to decode or validate.
    pub rejected: Vec<serde_json::Value>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collection<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and decode the collection, keeping track of dropped elements.
    ///
    /// A failed read is logged and treated as empty. Anything that writes the
    /// collection back must use [`Collection::records_for_update`] instead.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Loaded<T> {
        match store.get(self.key) {
            Ok(raw) => self.decode_all(raw.as_deref()),
            Err(e) => {
                tracing::warn!(collection = self.key, error = %e, "read failed, treating as empty");
                Loaded::default()
            }
        }
    }

    /// Read the collection ahead of a write-back.
    ///
    /// Absent or malformed values still load as empty, but a failed read is
    /// returned so the stored records are never overwritten blind.
    pub fn records_for_update<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<Vec<T>, StoreError> {
        let raw = store.get(self.key)?;
        Ok(self.decode_all(raw.as_deref()).records)
    }

    fn decode_all(&self, raw: Option<&str>) -> Loaded<T> {
        let Some(raw) = raw else {
            return Loaded::default();
        };

        let elements = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(elements)) => elements,
            Ok(_) => {
                tracing::warn!(collection = self.key, "stored value is not an array, treating as empty");
                return Loaded::default();
            }
            Err(e) => {
                tracing::warn!(collection = self.key, error = %e, "malformed JSON, treating as empty");
                return Loaded::default();
            }
        };

        let mut loaded = Loaded::default();
        for element in elements {
            match decode::<T>(&element) {
                Ok(record) => loaded.records.push(record),
                Err(reason) => {
                    tracing::warn!(collection = self.key, %reason, "dropping malformed record");
                    loaded.rejected.push(element);
                }
            }
        }
        loaded
    }

    /// Read the collection, discarding anything malformed.
    pub fn records<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<T> {
        self.load(store).records
    }

    /// Replace the stored collection.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records).map_err(|e| StoreError::Encode {
            key: self.key.to_string(),
            message: e.to_string(),
        })?;
        store.set(self.key, &json)
    }

    /// Load, push one record, write back. Fails without writing if the
    /// current value cannot be read.
    pub fn append<S: KeyValueStore + ?Sized>(&self, store: &S, record: T) -> Result<(), StoreError> {
        let mut records = self.records_for_update(store)?;
        records.push(record);
        self.save(store, &records)
    }
}

fn decode<T: Record>(element: &serde_json::Value) -> Result<T, String> {
    let record = <T as serde::Deserialize>::deserialize(element).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}
