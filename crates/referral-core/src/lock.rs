//! Advisory locking for `.referral/lock`.
//!
//! Readers take a shared lock for the duration of a snapshot load; writers
//! take an exclusive lock around the whole read-modify-write. Waiting backs
//! off from 1ms up to 50ms between attempts until the configured timeout.

use crate::error::ErrorCode;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const FIRST_BACKOFF: Duration = Duration::from_millis(1);
const MAX_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("{kind:?} lock on {} timed out after {waited:?}", path.display())]
    Timeout {
        path: PathBuf,
        kind: LockKind,
        waited: Duration,
    },

    #[error("failed to open lock file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LockError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::Open { .. } => ErrorCode::StoreWriteFailed,
        }
    }
}

/// Which side of the reader/writer lock to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    /// Many snapshot readers at once.
    Shared,
    /// One writer, no readers.
    Exclusive,
}

/// Held lock on the store's lock file; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    kind: LockKind,
}

impl StoreLock {
    /// Take `kind` on `path`, creating the file if needed.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] if another process holds a conflicting lock
    /// for longer than `timeout`, [`LockError::Open`] if the file cannot be
    /// created.
    pub fn acquire(path: &Path, kind: LockKind, timeout: Duration) -> Result<Self, LockError> {
        let open_err = |source| LockError::Open {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(open_err)?;

        let start = Instant::now();
        let mut backoff = FIRST_BACKOFF;
        let mut attempts = 0u32;
        loop {
            let taken = match kind {
                LockKind::Shared => FileExt::try_lock_shared(&file),
                LockKind::Exclusive => FileExt::try_lock_exclusive(&file),
            };
            if taken.is_ok() {
                if attempts > 0 {
                    debug!(?kind, attempts, waited = ?start.elapsed(), "store lock acquired after contention");
                }
                return Ok(Self { file, kind });
            }

            let waited = start.elapsed();
            if waited >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    kind,
                    waited,
                });
            }
            attempts += 1;
            thread::sleep(backoff.min(timeout - waited));
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    #[must_use]
    pub const fn kind(&self) -> LockKind {
        self.kind
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn lock_file(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join(".referral").join("lock")
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = lock_file(&dir);
        let lock = StoreLock::acquire(&path, LockKind::Exclusive, Duration::from_millis(50))
            .expect("lock");
        assert_eq!(lock.kind(), LockKind::Exclusive);
        assert!(path.is_file());
    }

    #[test]
    fn readers_share() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = lock_file(&dir);
        let _a = StoreLock::acquire(&path, LockKind::Shared, Duration::from_millis(50)).expect("a");
        let _b = StoreLock::acquire(&path, LockKind::Shared, Duration::from_millis(50)).expect("b");
    }

    #[test]
    fn writer_excludes_reader_until_dropped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = lock_file(&dir);
        let writer =
            StoreLock::acquire(&path, LockKind::Exclusive, Duration::from_millis(50)).expect("w");

        let err = StoreLock::acquire(&path, LockKind::Shared, Duration::from_millis(20))
            .expect_err("contended");
        assert!(matches!(err, LockError::Timeout { kind: LockKind::Shared, .. }));
        assert_eq!(err.code(), ErrorCode::LockContention);

        drop(writer);
        StoreLock::acquire(&path, LockKind::Shared, Duration::from_millis(50)).expect("free");
    }

    #[test]
    fn waiting_writer_gets_lock_once_released() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = lock_file(&dir);
        let reader =
            StoreLock::acquire(&path, LockKind::Shared, Duration::from_millis(50)).expect("r");

        let (tx, rx) = mpsc::channel();
        let path_in_thread = path.clone();
        let handle = thread::spawn(move || {
            tx.send(()).expect("signal");
            StoreLock::acquire(&path_in_thread, LockKind::Exclusive, Duration::from_secs(2))
                .map(|l| l.kind())
        });

        rx.recv().expect("thread started");
        thread::sleep(Duration::from_millis(20));
        drop(reader);
        let kind = handle.join().expect("writer thread").expect("writer lock");
        assert_eq!(kind, LockKind::Exclusive);
    }

    #[test]
    fn unopenable_path_is_an_open_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("plain");
        fs::write(&file, "x").expect("write");
        // parent is a regular file, so the directory cannot be created
        let err = StoreLock::acquire(&file.join("lock"), LockKind::Shared, Duration::from_millis(10))
            .expect_err("open");
        assert_eq!(err.code(), ErrorCode::StoreWriteFailed);
    }
}
