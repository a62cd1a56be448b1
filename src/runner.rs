//! Top-level orchestration.
//!
//! One invocation is one run: load both stores, take the run lock, process
//! either the freshly subscribed feed or every registered feed in order,
//! then finalize.  Finalize is an explicit, ordered step — release the
//! lock, flush the registry, flush the ledger, flush the notifier — never
//! something left to destructors.
//!
//! Failure semantics are deliberately blunt: the first fetch or download
//! error terminates the run and abandons the remaining feeds, and the
//! lock file stays behind so the operator notices.  Per-feed isolation
//! would hide exactly the failures a cron job should surface.

use tracing::{info, warn};

use crate::config::Config;
use crate::download::Downloader;
use crate::error::{Error, Result};
use crate::feed::FeedSource;
use crate::lock::RunLock;
use crate::notify::{MailTransport, Notifier};
use crate::processor::{FeedProcessor, ProcessOptions};
use crate::store::{DownloadLedger, FeedRegistry};

/// Terminal outcome of a run.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Another run holds the lock; nothing was mutated.
    AlreadyRunning,
}

/// Execute one full run.
pub fn run(
    config: &Config,
    source: &dyn FeedSource,
    downloader: &dyn Downloader,
    transport: Option<&dyn MailTransport>,
) -> Result<RunOutcome> {
    let mut registry = FeedRegistry::open(&config.feeds_file)?;
    let mut ledger = DownloadLedger::open(&config.ledger_file, config.ledger_cap)?;
    let mut notifier = Notifier::new();

    let lock = RunLock::new(&config.lock_file);
    match lock.acquire() {
        Ok(()) => {}
        Err(Error::LockHeld { path }) => {
            info!(lock = %path.display(), "already running");
            return Ok(RunOutcome::AlreadyRunning);
        }
        Err(e) => return Err(e),
    }

    info!(dry_run = config.dry_run, "podcatch running");
    let options = ProcessOptions {
        dry_run: config.dry_run,
        latest_only: config.latest_only,
        all_entries: config.all_entries,
    };
    let processor = FeedProcessor::new(source, downloader, &config.cache_dir, options);

    if let Some(url) = &config.subscribe {
        info!(%url, "subscribing");
        if !config.dry_run {
            registry.add(url);
        }
        processor.process(url, &mut ledger, &mut notifier)?;
    } else {
        let urls: Vec<String> = registry.urls().map(str::to_string).collect();
        for url in &urls {
            processor.process(url, &mut ledger, &mut notifier)?;
        }
    }

    finalize(&lock, &mut registry, &mut ledger, &notifier, transport)
}

/// The ordered teardown of a completed run.
fn finalize(
    lock: &RunLock,
    registry: &mut FeedRegistry,
    ledger: &mut DownloadLedger,
    notifier: &Notifier,
    transport: Option<&dyn MailTransport>,
) -> Result<RunOutcome> {
    lock.release()?;
    registry.flush()?;
    ledger.flush()?;
    match transport {
        Some(transport) => notifier.flush(transport)?,
        None if !notifier.is_empty() => {
            warn!("mail transport not configured; listing downloads here instead");
            for title in notifier.titles() {
                info!(%title, "downloaded");
            }
        }
        None => {}
    }
    Ok(RunOutcome::Completed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
