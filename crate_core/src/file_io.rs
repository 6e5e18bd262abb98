//! # File I/O Module
//!
//! Reading inputs and writing artifacts with safety features:
//! - **Atomic writes**: Write to .tmp, fsync, rename so a reader never sees a half-written file
//! - **File locking**: Two exports to the same shared-drive path cannot interleave
//!
//! ## File Formats
//!
//! - Configurations and settings are plain JSON.
//! - Lock files add `.lock` to the extension and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use crate_core::file_io::{load_configuration, write_artifact};
//! use crate_core::model::build_model;
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::export::{generate_expression_file, ExportMetadata};
//! use std::path::Path;
//!
//! let config = load_configuration(Path::new("crate.json"))?;
//! let model = build_model(&config, &SpliceOptions::default())?;
//! let file = generate_expression_file(&model, &ExportMetadata::default())?;
//! write_artifact(Path::new(&file.filename), file.content.as_bytes())?;
//! # Ok::<(), crate_core::errors::CrateError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::configuration::CrateConfiguration;
use crate::errors::{CrateError, CrateResult};
use crate::settings::Settings;

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Login name used when the caller doesn't supply one
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "autocrate".to_string())
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the file being protected
    target_path: PathBuf,
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with `FileLocked` when a live lock is held elsewhere. Locks
    /// older than 24 hours, or left by a dead process on this machine, are
    /// taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CrateResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CrateError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                debug!(path = %lock_path.display(), holder = %existing.user_id, "Taking over stale lock");
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                CrateError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            CrateError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info)
            .map_err(|e| CrateError::serialization("JSON", e.to_string()))?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            CrateError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            CrateError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file is dropped
    }
}

/// `name.ext` -> `name.ext.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{suffix}", e.to_string_lossy()))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn lock_path_for(path: &Path) -> PathBuf {
    sibling_path(path, "lock")
}

fn read_lock_info(lock_path: &Path) -> CrateResult<LockInfo> {
    let contents = read_text(lock_path)?;
    serde_json::from_str(&contents).map_err(|e| CrateError::serialization("JSON", e.to_string()))
}

/// Check if a lock is stale (holder process gone, or older than a day)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

fn read_text(path: &Path) -> CrateResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CrateError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CrateError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `bytes` to `path` atomically while holding its lock.
///
/// 1. Acquire the file lock
/// 2. Write to a temporary sibling (`.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target
///
/// On any failure the target is left as it was.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> CrateResult<()> {
    let _lock = FileLock::acquire(path, current_user())?;
    let tmp_path = sibling_path(path, "tmp");

    let result = write_and_sync(&tmp_path, bytes).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| {
            CrateError::file_error("rename to final", path.display().to_string(), e.to_string())
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    info!(path = %path.display(), bytes = bytes.len(), "Artifact written");
    Ok(())
}

fn write_and_sync(tmp_path: &Path, bytes: &[u8]) -> CrateResult<()> {
    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        CrateError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CrateError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CrateError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })
}

/// Load and validate a crate configuration JSON file.
pub fn load_configuration(path: &Path) -> CrateResult<CrateConfiguration> {
    let contents = read_text(path)?;
    CrateConfiguration::from_json(&contents)
}

/// Load and validate a settings JSON file.
pub fn load_settings(path: &Path) -> CrateResult<Settings> {
    let contents = read_text(path)?;
    Settings::from_json(&contents)
}
