//! Flat-file line persistence.
//!
//! This module defines the generic [`LineStore`] and the two narrow types
//! built on it: [`FeedRegistry`] (subscribed feed URLs) and
//! [`DownloadLedger`] (what has already been downloaded).  Both wrap a
//! `LineStore` by composition and expose only their own operations — the
//! backing line sequence is never handed out for mutation.
//!
//! Lifecycle: open once at process start, mutate in memory during the run,
//! flush exactly once at the end.  A dirty flag makes the flush a no-op
//! when nothing changed.

mod ledger;
mod registry;

pub use ledger::DownloadLedger;
pub use registry::FeedRegistry;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// An ordered list of lines backed by a flat text file.
///
/// `open` requires the file to exist: the operator pre-creates empty files
/// on first setup, and a missing file at run time means a misconfigured
/// installation, not a fresh one.
#[derive(Debug)]
pub(crate) struct LineStore {
    path: PathBuf,
    lines: Vec<String>,
    dirty: bool,
    sort_on_save: bool,
}

impl LineStore {
    pub(crate) fn open(path: &Path, sort_on_save: bool) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Store {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: contents.lines().map(str::to_string).collect(),
            dirty: false,
            sort_on_save,
        })
    }

    pub(crate) fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub(crate) fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.dirty = true;
    }

    pub(crate) fn insert_front(&mut self, line: &str) {
        self.lines.insert(0, line.to_string());
        self.dirty = true;
    }

    /// Drop the last (oldest, for front-inserted stores) line.
    pub(crate) fn pop_back(&mut self) {
        if self.lines.pop().is_some() {
            self.dirty = true;
        }
    }

    /// Write all lines back, newline-terminated, only if something changed.
    /// Sorts first when the sort-on-save policy is set.  Clears the dirty
    /// flag on success.
    pub(crate) fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if self.sort_on_save {
            self.lines.sort();
        }
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        fs::write(&self.path, out).map_err(|source| Error::Store {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn open_fails_when_file_missing() {
        let err = LineStore::open(Path::new("/nonexistent/feeds.conf"), false).unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[test]
    fn open_reads_existing_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "alpha").unwrap();
        writeln!(file, "beta").unwrap();

        let store = LineStore::open(file.path(), false).unwrap();
        assert_eq!(store.iter().collect::<Vec<_>>(), ["alpha", "beta"]);
        assert!(store.contains("alpha"));
        assert!(!store.contains("gamma"));
    }

    #[test]
    fn flush_is_noop_when_clean() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "alpha").unwrap();

        let mut store = LineStore::open(file.path(), false).unwrap();
        store.flush().unwrap();

        let on_disk = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(on_disk, "alpha\n");
    }

    #[test]
    fn flush_writes_and_clears_dirty() {
        let file = NamedTempFile::new().unwrap();
        let mut store = LineStore::open(file.path(), false).unwrap();
        store.push("one");
        store.push("two");
        store.flush().unwrap();
        assert!(!store.dirty);
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "one\ntwo\n"
        );
    }

    #[test]
    fn flush_sorts_when_policy_set() {
        let file = NamedTempFile::new().unwrap();
        let mut store = LineStore::open(file.path(), true).unwrap();
        store.push("zebra");
        store.push("aardvark");
        store.flush().unwrap();
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "aardvark\nzebra\n"
        );
    }
}
