//! The download log (`downloaded.log`).
//!
//! One line per downloaded enclosure, `<feed-title>/<filename>`, newest
//! first.  Exact-match lookup against this file is the sole deduplication
//! mechanism — no content hashing, no fuzzy matching.

use std::path::Path;

use super::LineStore;
use crate::error::Result;

/// Newest-first record of downloaded enclosures, capped at a maximum
/// length.  Never sorted: insertion order is the meaningful order.
pub struct DownloadLedger {
    store: LineStore,
    cap: usize,
}

impl DownloadLedger {
    pub fn open(path: &Path, cap: usize) -> Result<Self> {
        Ok(Self {
            store: LineStore::open(path, false)?,
            cap,
        })
    }

    /// Record a download at the front.  When the ledger grows past its
    /// cap, the oldest entry is evicted — one per add.
    pub fn add(&mut self, key: &str) {
        self.store.insert_front(key);
        if self.store.len() > self.cap {
            self.store.pop_back();
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }
}
