// src/history/store.rs

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use crate::{
    config::{HISTORY_KEY, HISTORY_RETENTION_DAYS},
    error::AppError,
    models::saved_test::SavedTest,
};

/// Retention window in milliseconds.
pub const RETENTION_MS: i64 = HISTORY_RETENTION_DAYS * 24 * 60 * 60 * 1000;

/// Key/value storage for whole text blobs (the local-storage model: one
/// key, one string, replaced as a unit).
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// History of completed tests.
pub trait TestHistory: Send + Sync {
    /// Tests inside the retention window, oldest first.
    fn load(&self) -> Result<Vec<SavedTest>, AppError>;

    /// Adds `test` after the retained tests and persists the result.
    fn append(&self, test: SavedTest) -> Result<(), AppError>;
}

/// Whether a test stamped `timestamp` is still visible at `now` (both epoch ms).
///
/// The age saturates, so a timestamp far in the past is simply expired.
pub fn is_retained(timestamp: i64, now: i64) -> bool {
    now.saturating_sub(timestamp) < RETENTION_MS
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Keeps the whole history as one JSON array under a single blob key.
///
/// Expired entries are filtered on every read and disappear from storage on
/// the next append. The read-then-write in `append` is serialized within this
/// process only; two processes sharing the same store can lose updates.
pub struct BlobHistory<S> {
    store: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: BlobStore> BlobHistory<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_at(&self, now: i64) -> Result<Vec<SavedTest>, AppError> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let tests: Vec<SavedTest> = serde_json::from_str(&blob).map_err(|e| {
            AppError::Storage(format!("history blob {:?} is not a test list: {}", self.key, e))
        })?;

        let total = tests.len();
        let retained: Vec<SavedTest> = tests
            .into_iter()
            .filter(|test| is_retained(test.timestamp, now))
            .collect();

        if retained.len() < total {
            tracing::debug!("{} saved tests past retention", total - retained.len());
        }

        Ok(retained)
    }

    pub fn append_at(&self, test: SavedTest, now: i64) -> Result<(), AppError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Storage("history write lock poisoned".to_string()))?;

        let mut tests = self.load_at(now)?;
        tests.push(test);

        let blob = serde_json::to_string(&tests)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        self.store.set(&self.key, &blob)?;

        tracing::info!("Saved test history now holds {} entries", tests.len());
        Ok(())
    }
}

impl<S: BlobStore> TestHistory for BlobHistory<S> {
    fn load(&self) -> Result<Vec<SavedTest>, AppError> {
        self.load_at(now_millis())
    }

    fn append(&self, test: SavedTest) -> Result<(), AppError> {
        self.append_at(test, now_millis())
    }
}

/// In-process blob store, mostly for tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each blob as `<dir>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old or the new list, never half of one.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
