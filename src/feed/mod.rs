//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait and the normalized
//! [`Feed`]/[`Entry`] types.  The concrete RSS implementation lives in the
//! [`rss`] sub-module; the processing pipeline only ever sees the
//! normalized form, so adding Atom or JSON Feed support later means one
//! new sub-module and nothing else.

mod rss;

pub use rss::RssSource;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// A parsed feed, normalized from any source format.
///
/// Ephemeral: produced per run while processing one feed URL, never
/// persisted.  Entries keep the feed's own order, which podcast feeds
/// conventionally publish newest-first — the dedupe early-stop logic
/// relies on that convention.
#[derive(Debug, Clone)]
pub struct Feed {
    /// Feed title; also names the per-feed cache directory and prefixes
    /// every ledger key.
    pub title: String,
    pub entries: Vec<Entry>,
}

/// One feed entry.
#[derive(Debug, Clone)]
pub struct Entry {
    pub title: String,
    /// Publication timestamp, shown in progress narration.  `None` when
    /// the feed omits or mangles the date.
    pub published: Option<DateTime<Utc>>,
    /// First enclosure URL, the downloadable payload.  `None` for
    /// entries that carry no media attachment.
    pub enclosure: Option<String>,
}

/// Fetch-and-parse boundary.
///
/// The pipeline depends on this trait rather than on HTTP directly so
/// tests can feed it canned [`Feed`] values.
pub trait FeedSource {
    fn fetch(&self, url: &str) -> Result<Feed>;
}
