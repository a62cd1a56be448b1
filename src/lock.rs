//! Cross-process run locking via a sentinel file.
//!
//! Presence of the file means a run is in progress.  Acquisition uses the
//! kernel's exclusive-create so two simultaneous cron invocations cannot
//! both win the race.  A crash before release leaves the file behind and
//! blocks future runs until it is cleared by hand — that failure mode is
//! deliberate and documented rather than silently repaired, since a stale
//! lock usually means a previous run died mid-download.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Create the lock file, failing with [`Error::LockHeld`] if it
    /// already exists.  The existing file is left untouched in that case.
    pub fn acquire(&self) -> Result<()> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::LockHeld {
                path: self.path.clone(),
            }),
            Err(source) => Err(Error::Lock {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Remove the lock file.  Best-effort: a file already gone (removed
    /// externally, or never created on this run) is not an error.
    pub fn release(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Lock {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
