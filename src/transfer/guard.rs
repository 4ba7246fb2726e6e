//! Ensures only one import attempt is in flight at a time.
//!
//! The in-process lock covers attempts sharing an [`ImportGuard`]. An optional
//! lock file extends this to other processes using the same catalog.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::ImportError;

/// Shared gate around the lifetime of an import plan or review.
#[derive(Debug, Clone, Default)]
pub struct ImportGuard {
    lock: Arc<Mutex<()>>,
    lock_file: Option<PathBuf>,
}

/// Proof that the holder owns the current import attempt. Released on drop.
#[derive(Debug)]
pub struct ImportAttempt {
    _permit: OwnedMutexGuard<()>,
    lock_file: Option<PathBuf>,
}

impl ImportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also claims `path` for the duration of each attempt.
    pub fn with_lock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_file = Some(path.into());
        self
    }

    /// Claims the attempt, or fails if another one is still running.
    pub fn try_begin(&self) -> Result<ImportAttempt, ImportError> {
        let permit = self.lock.clone().try_lock_owned().map_err(|_| {
            tracing::warn!("Rejected import: another attempt is in progress");
            ImportError::AttemptInProgress
        })?;

        if let Some(path) = &self.lock_file {
            claim_lock_file(path)?;
        }

        Ok(ImportAttempt {
            _permit: permit,
            lock_file: self.lock_file.clone(),
        })
    }
}

fn claim_lock_file(path: &Path) -> Result<(), ImportError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::debug!("Claimed import lock {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::warn!(
                "Rejected import: {} exists; remove it if no other import is running",
                path.display()
            );
            Err(ImportError::AttemptInProgress)
        }
        Err(e) => Err(ImportError::StoreFailure(format!(
            "{}: {}",
            path.display(),
            e
        ))),
    }
}

impl Drop for ImportAttempt {
    fn drop(&mut self) {
        if let Some(path) = &self.lock_file {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!("Failed to remove import lock {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_second_attempt_is_rejected_until_first_ends() {
        let guard = ImportGuard::new();
        let other = guard.clone();

        let attempt = guard.try_begin().unwrap();
        assert_eq!(
            other.try_begin().unwrap_err(),
            ImportError::AttemptInProgress
        );

        drop(attempt);
        assert!(other.try_begin().is_ok());
    }

    #[tokio::test]
    async fn test_attempt_released_when_task_fails() {
        let guard = ImportGuard::new();
        let task_guard = guard.clone();

        let result = tokio::spawn(async move {
            let _attempt = task_guard.try_begin()?;
            Err::<(), ImportError>(ImportError::EmptyOrAllInvalid)
        })
        .await
        .unwrap();

        assert_eq!(result, Err(ImportError::EmptyOrAllInvalid));
        assert!(guard.try_begin().is_ok());
    }

    #[test]
    fn test_lock_file_rejects_independent_guard() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("library.import.lock");

        // Separate guards stand in for separate processes
        let first = ImportGuard::new().with_lock_file(&lock_path);
        let second = ImportGuard::new().with_lock_file(&lock_path);

        let attempt = first.try_begin().unwrap();
        assert!(lock_path.exists());
        assert_eq!(
            second.try_begin().unwrap_err(),
            ImportError::AttemptInProgress
        );

        drop(attempt);
        assert!(!lock_path.exists());
        assert!(second.try_begin().is_ok());
    }

    #[test]
    fn test_rejected_lock_file_releases_in_process_lock() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join("library.import.lock");
        std::fs::write(&lock_path, b"").unwrap();

        let guard = ImportGuard::new().with_lock_file(&lock_path);
        assert_eq!(
            guard.try_begin().unwrap_err(),
            ImportError::AttemptInProgress
        );

        // A failed claim must leave the stale file alone and the mutex free
        assert!(lock_path.exists());
        std::fs::remove_file(&lock_path).unwrap();
        assert!(guard.try_begin().is_ok());
    }
}
