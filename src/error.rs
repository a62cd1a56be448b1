//! Error types and exit-code mapping.
//!
//! One enum covers every way a run can fail.  Each variant carries enough
//! context to diagnose the problem from a cron mail alone, and maps to a
//! distinct process exit code so wrapper scripts can tell failure classes
//! apart without parsing output.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source for errors originating in third-party crates.
type Source = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration (bad flag combination, partial
    /// SMTP settings, missing `HOME`).
    #[error("configuration error: {0}")]
    Config(String),

    /// A file the run expects to pre-exist (feeds file, download log)
    /// could not be read or written.
    #[error("cannot access {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the lock.  Non-fatal: the caller aborts cleanly
    /// without touching any state.
    #[error("already running (lock file {} exists)", path.display())]
    LockHeld { path: PathBuf },

    /// I/O failure creating or removing the lock file itself.
    #[error("lock file {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Feed could not be fetched or parsed.
    #[error("failed to fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Source,
    },

    /// Enclosure transfer failed.  A partially-written destination file may
    /// be left on disk; there is no atomic write-then-rename.
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: Source,
    },

    /// Per-feed cache directory could not be created.
    #[error("cannot create cache directory {}: {source}", path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Notification delivery failed.  Only reachable after all downloads
    /// completed, so downloads are never lost to this.
    #[error("failed to send notification: {0}")]
    Notify(Source),
}

/// Exit code for a run aborted because another run holds the lock.
pub const EXIT_LOCK_HELD: i32 = 2;

impl Error {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::LockHeld { .. } => EXIT_LOCK_HELD,
            Error::Config(_) | Error::Store { .. } | Error::Lock { .. } => 3,
            Error::Fetch { .. } => 4,
            Error::Download { .. } | Error::CacheDir { .. } => 5,
            Error::Notify(_) => 6,
        }
    }
}
