//! The subscribed-feeds file (`feeds.conf`), one URL per line.

use std::path::Path;

use super::LineStore;
use crate::error::Result;

/// Ordered set of subscribed feed URLs.  Insert-only; kept sorted on disk
/// so the file diffs cleanly under version control or manual edits.
pub struct FeedRegistry {
    store: LineStore,
}

impl FeedRegistry {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: LineStore::open(path, true)?,
        })
    }

    /// Add a feed URL.  Idempotent: an exact-match duplicate is ignored.
    pub fn add(&mut self, url: &str) {
        if !self.store.contains(url) {
            self.store.push(url);
        }
    }

    /// Subscribed URLs in stored order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.store.iter()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }
}
