// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-addressed durable storage.
//!
//! The store holds opaque string values under fixed keys and has no notion
//! of what they contain. Every write is committed before the call returns.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Namespace used for the pending log, distinct from any remote-cache data.
pub const DEFAULT_NAMESPACE: &str = "relais";

const LOCK_FILE_NAME: &str = ".lock";
const RUN_LOCK_FILE_NAME: &str = "sync.lock";

/// Rewrites the value under a key from its current value.
pub type UpdateFn<'a> = Box<dyn FnOnce(Option<String>) -> Result<String> + 'a>;

/// Durable get/set/delete of opaque records.
pub trait DurableStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Reads `key`, passes the value to `f` and stores what it returns.
    ///
    /// No other writer, in this process or another, can change `key` between
    /// the read and the write. Nothing is stored if `f` fails.
    fn update(&self, key: &str, f: UpdateFn<'_>) -> Result<()>;

    /// Claims the right to run a synchronization pass over this store.
    ///
    /// Returns `None` if another handle holds it. The claim is released
    /// when the returned lock is dropped.
    fn try_lock_runs(&self) -> Result<Option<RunLock>>;
}

/// Claim on synchronization runs, released on drop.
#[derive(Debug)]
pub struct RunLock {
    held: Held,
}

#[derive(Debug)]
enum Held {
    File(File),
    Flag(Arc<AtomicBool>),
}

impl Drop for RunLock {
    fn drop(&mut self) {
        match &self.held {
            Held::File(file) => {
                let _ = FileExt::unlock(file);
            }
            Held::Flag(flag) => flag.store(false, Ordering::Release),
        }
    }
}

/// File-backed store: one file per key under a directory.
///
/// Writes go to a temporary file that is fsynced and renamed over the
/// target, so a crash leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    namespace: String,
}

impl FileStore {
    /// Opens (creating if needed) a store in `dir` with the default namespace.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::with_namespace(dir, DEFAULT_NAMESPACE)
    }

    /// Opens (creating if needed) a store in `dir` with a custom namespace.
    pub fn with_namespace(dir: &Path, namespace: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
            namespace: namespace.to_string(),
        })
    }

    /// Returns the directory holding the store files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path backing `key`.
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.namespace, key))
    }

    fn lock_file(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE_NAME))?;
        Ok(file)
    }

    fn read_locked(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_locked(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp_path = self.dir.join(format!("{}.{}.tmp", self.namespace, key));

        let mut file = File::create(&tmp_path)?;
        if let Err(e) = file.write_all(value.as_bytes()).and_then(|()| file.sync_all()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        drop(file);

        fs::rename(&tmp_path, &path)?;
        self.sync_dir()
    }

    fn sync_dir(&self) -> Result<()> {
        #[cfg(unix)]
        File::open(&self.dir)?.sync_all()?;
        Ok(())
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock)?;
        self.read_locked(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock)?;
        self.write_locked(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock)?;

        match fs::remove_file(self.key_path(key)) {
            Ok(()) => self.sync_dir(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, key: &str, f: UpdateFn<'_>) -> Result<()> {
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock)?;
        let next = f(self.read_locked(key)?)?;
        self.write_locked(key, &next)
    }

    fn try_lock_runs(&self) -> Result<Option<RunLock>> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(RUN_LOCK_FILE_NAME))?;
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Some(RunLock {
                held: Held::File(file),
            })),
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Failure injected into a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    Full,
    Unavailable,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    fault: Option<StoreFault>,
}

/// In-process store. Clones share the same contents, which lets a test
/// drop a log and reopen it over the "same device".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    running: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `fault`, or heals the store
    /// when `None`.
    pub fn set_fault(&self, fault: Option<StoreFault>) {
        self.lock().fault = fault;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_fault(inner: &MemoryInner) -> Result<()> {
        match inner.fault {
            Some(StoreFault::Full) => Err(Error::StorageFull("memory store is full".into())),
            Some(StoreFault::Unavailable) => Err(Error::StorageUnavailable(
                "memory store is unavailable".into(),
            )),
            None => Ok(()),
        }
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.lock();
        if inner.fault == Some(StoreFault::Unavailable) {
            Self::check_fault(&inner)?;
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock();
        Self::check_fault(&inner)?;
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut inner = self.lock();
        Self::check_fault(&inner)?;
        inner.values.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, f: UpdateFn<'_>) -> Result<()> {
        let mut inner = self.lock();
        Self::check_fault(&inner)?;
        let next = f(inner.values.get(key).cloned())?;
        inner.values.insert(key.to_string(), next);
        Ok(())
    }

    fn try_lock_runs(&self) -> Result<Option<RunLock>> {
        if self.running.swap(true, Ordering::Acquire) {
            return Ok(None);
        }
        Ok(Some(RunLock {
            held: Held::Flag(self.running.clone()),
        }))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
