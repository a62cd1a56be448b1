//! The per-feed download-and-dedupe pipeline.
//!
//! Processes exactly one feed URL to completion: fetch and normalize the
//! feed, walk its entries in feed order, download enclosures the ledger
//! has not seen, and record each download with the ledger and the
//! notifier.  Podcast feeds publish newest-first, so the first
//! already-downloaded entry normally means everything after it was seen
//! on an earlier run and the walk stops there.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::download::{destination_name, enclosure_basename, Downloader};
use crate::error::{Error, Result};
use crate::feed::{Entry, Feed, FeedSource};
use crate::notify::Notifier;
use crate::store::DownloadLedger;

/// Per-run behaviour switches, resolved from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Make every decision but perform no directory creation, download,
    /// or recording.
    pub dry_run: bool,
    /// Stop after the first entry regardless of outcome.
    pub latest_only: bool,
    /// Scan every entry instead of stopping at the first duplicate
    /// (historical catch-up).
    pub all_entries: bool,
}

/// What happened to a single entry.
enum Outcome {
    Downloaded,
    Duplicate,
    Skipped,
}

pub struct FeedProcessor<'a> {
    source: &'a dyn FeedSource,
    downloader: &'a dyn Downloader,
    cache_dir: &'a Path,
    options: ProcessOptions,
}

impl<'a> FeedProcessor<'a> {
    pub fn new(
        source: &'a dyn FeedSource,
        downloader: &'a dyn Downloader,
        cache_dir: &'a Path,
        options: ProcessOptions,
    ) -> Self {
        Self {
            source,
            downloader,
            cache_dir,
            options,
        }
    }

    /// Process one feed URL to completion or first failure.
    pub fn process(
        &self,
        url: &str,
        ledger: &mut DownloadLedger,
        notifier: &mut Notifier,
    ) -> Result<()> {
        info!(%url, "processing feed");
        let feed = self.source.fetch(url)?;
        info!(feed = %feed.title, entries = feed.entries.len(), "feed fetched");

        let feed_dir = self.cache_dir.join(&feed.title);
        if !self.options.dry_run && !feed_dir.exists() {
            debug!(dir = %feed_dir.display(), "creating feed directory");
            fs::create_dir_all(&feed_dir).map_err(|source| Error::CacheDir {
                path: feed_dir.clone(),
                source,
            })?;
        }

        for entry in &feed.entries {
            match self.handle_entry(&feed, &feed_dir, entry, ledger, notifier)? {
                // First duplicate: everything older was seen on an
                // earlier run, unless we're doing a full catch-up scan.
                Outcome::Duplicate if !self.options.all_entries => break,
                Outcome::Downloaded | Outcome::Duplicate | Outcome::Skipped => {}
            }
            if self.options.latest_only {
                break;
            }
        }
        Ok(())
    }

    fn handle_entry(
        &self,
        feed: &Feed,
        feed_dir: &Path,
        entry: &Entry,
        ledger: &mut DownloadLedger,
        notifier: &mut Notifier,
    ) -> Result<Outcome> {
        match entry.published {
            Some(date) => info!(title = %entry.title, %date, "checking entry"),
            None => info!(title = %entry.title, "checking entry"),
        }

        let Some(enclosure) = entry.enclosure.as_deref() else {
            warn!(title = %entry.title, "entry has no enclosure, skipping");
            return Ok(Outcome::Skipped);
        };
        let Some(basename) = enclosure_basename(enclosure) else {
            warn!(url = %enclosure, "cannot derive a filename from enclosure URL, skipping");
            return Ok(Outcome::Skipped);
        };

        let key = format!("{}/{}", feed.title, basename);
        if ledger.contains(&key) {
            info!(%key, "already downloaded");
            return Ok(Outcome::Duplicate);
        }

        info!(%key, "downloading");
        if !self.options.dry_run {
            let dest = feed_dir.join(destination_name(&entry.title, &basename));
            self.downloader.download(enclosure, &dest)?;
            ledger.add(&key);
            notifier.record(&entry.title);
        }
        Ok(Outcome::Downloaded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::{tempdir, NamedTempFile, TempDir};

    struct FakeSource {
        feed: Feed,
    }

    impl FeedSource for FakeSource {
        fn fetch(&self, _url: &str) -> Result<Feed> {
            Ok(self.feed.clone())
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        calls: RefCell<Vec<(String, PathBuf)>>,
    }

    impl Downloader for RecordingDownloader {
        fn download(&self, url: &str, dest: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), dest.to_path_buf()));
            Ok(())
        }
    }

    fn entry(title: &str, enclosure: Option<&str>) -> Entry {
        Entry {
            title: title.to_string(),
            published: None,
            enclosure: enclosure.map(str::to_string),
        }
    }

    /// The standard fixture from newest to oldest: one new entry, one
    /// already downloaded, one new.
    fn fixture() -> Feed {
        Feed {
            title: "Show".to_string(),
            entries: vec![
                entry("E1", Some("https://example.com/e1.mp3")),
                entry("E2", Some("https://example.com/e2.mp3")),
                entry("E3", Some("https://example.com/e3.mp3")),
            ],
        }
    }

    fn ledger_with(keys: &[&str]) -> (DownloadLedger, NamedTempFile) {
        let file = NamedTempFile::new().unwrap();
        let mut ledger = DownloadLedger::open(file.path(), 100).unwrap();
        for key in keys {
            ledger.add(key);
        }
        (ledger, file)
    }

    fn run_fixture(options: ProcessOptions) -> (DownloadLedger, Notifier, RecordingDownloader, TempDir, NamedTempFile) {
        let dir = tempdir().unwrap();
        let source = FakeSource { feed: fixture() };
        let downloader = RecordingDownloader::default();
        let (mut ledger, file) = ledger_with(&["Show/e2.mp3"]);
        let mut notifier = Notifier::new();

        FeedProcessor::new(&source, &downloader, dir.path(), options)
            .process("http://example.com/feed.xml", &mut ledger, &mut notifier)
            .unwrap();

        (ledger, notifier, downloader, dir, file)
    }

    #[test]
    fn stops_at_first_duplicate() {
        let (ledger, notifier, downloader, _dir, _file) =
            run_fixture(ProcessOptions::default());

        let calls = downloader.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://example.com/e1.mp3");

        assert!(ledger.contains("Show/e1.mp3"));
        assert!(!ledger.contains("Show/e3.mp3"), "E3 must never be fetched");
        assert_eq!(notifier.titles(), ["E1"]);
    }

    #[test]
    fn all_entries_skips_duplicates_and_continues() {
        let (ledger, notifier, downloader, _dir, _file) = run_fixture(ProcessOptions {
            all_entries: true,
            ..Default::default()
        });

        let urls: Vec<_> = downloader
            .calls
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect();
        assert_eq!(
            urls,
            ["https://example.com/e1.mp3", "https://example.com/e3.mp3"]
        );
        assert!(ledger.contains("Show/e1.mp3") && ledger.contains("Show/e3.mp3"));
        assert_eq!(notifier.titles(), ["E1", "E3"]);
    }

    #[test]
    fn latest_only_stops_after_first_entry() {
        let (ledger, _notifier, downloader, _dir, _file) = run_fixture(ProcessOptions {
            latest_only: true,
            ..Default::default()
        });

        assert_eq!(downloader.calls.borrow().len(), 1);
        assert!(!ledger.contains("Show/e3.mp3"));
    }

    #[test]
    fn latest_only_stops_even_when_first_entry_is_duplicate() {
        let dir = tempdir().unwrap();
        let mut feed = fixture();
        feed.entries.rotate_left(1); // E2 (the duplicate) first
        let source = FakeSource { feed };
        let downloader = RecordingDownloader::default();
        let (mut ledger, _file) = ledger_with(&["Show/e2.mp3"]);
        let mut notifier = Notifier::new();

        let options = ProcessOptions {
            latest_only: true,
            all_entries: true,
            ..Default::default()
        };
        FeedProcessor::new(&source, &downloader, dir.path(), options)
            .process("http://example.com/feed.xml", &mut ledger, &mut notifier)
            .unwrap();

        assert!(downloader.calls.borrow().is_empty());
    }

    #[test]
    fn dry_run_decides_but_touches_nothing() {
        let (ledger, notifier, downloader, dir, _file) = run_fixture(ProcessOptions {
            dry_run: true,
            ..Default::default()
        });

        assert!(downloader.calls.borrow().is_empty());
        assert!(!ledger.contains("Show/e1.mp3"));
        assert!(notifier.is_empty());
        assert!(
            !dir.path().join("Show").exists(),
            "dry run must not create the feed directory"
        );
    }

    #[test]
    fn destination_is_sanitized_title_with_original_extension() {
        let dir = tempdir().unwrap();
        let source = FakeSource {
            feed: Feed {
                title: "Show".to_string(),
                entries: vec![entry(
                    "Ep. 5: A/B Test?!",
                    Some("https://example.com/ep05.mp3?auth=tok"),
                )],
            },
        };
        let downloader = RecordingDownloader::default();
        let (mut ledger, _file) = ledger_with(&[]);
        let mut notifier = Notifier::new();

        FeedProcessor::new(&source, &downloader, dir.path(), ProcessOptions::default())
            .process("http://example.com/feed.xml", &mut ledger, &mut notifier)
            .unwrap();

        let calls = downloader.calls.borrow();
        assert_eq!(calls[0].1, dir.path().join("Show").join("Ep. 5 AB Test.mp3"));
        assert!(ledger.contains("Show/ep05.mp3"), "key uses the URL basename");
    }

    #[test]
    fn entry_without_enclosure_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let source = FakeSource {
            feed: Feed {
                title: "Show".to_string(),
                entries: vec![
                    entry("text-only", None),
                    entry("E1", Some("https://example.com/e1.mp3")),
                ],
            },
        };
        let downloader = RecordingDownloader::default();
        let (mut ledger, _file) = ledger_with(&[]);
        let mut notifier = Notifier::new();

        FeedProcessor::new(&source, &downloader, dir.path(), ProcessOptions::default())
            .process("http://example.com/feed.xml", &mut ledger, &mut notifier)
            .unwrap();

        assert_eq!(downloader.calls.borrow().len(), 1);
        assert!(ledger.contains("Show/e1.mp3"));
    }

    #[test]
    fn fetch_error_propagates() {
        struct BrokenSource;
        impl FeedSource for BrokenSource {
            fn fetch(&self, url: &str) -> Result<Feed> {
                Err(Error::Fetch {
                    url: url.to_string(),
                    source: "connection refused".into(),
                })
            }
        }

        let dir = tempdir().unwrap();
        let downloader = RecordingDownloader::default();
        let (mut ledger, _file) = ledger_with(&[]);
        let mut notifier = Notifier::new();

        let err = FeedProcessor::new(&BrokenSource, &downloader, dir.path(), ProcessOptions::default())
            .process("http://example.com/feed.xml", &mut ledger, &mut notifier)
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
