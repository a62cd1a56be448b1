//! podcatch — a cron-friendly podcatcher.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  Config   ┌───────────┐  process()  ┌──────────────┐
//! │  cli.rs  │ ────────► │ runner.rs │ ──────────► │ processor.rs │
//! │ (flags)  │           │ (one run) │             │  (per feed)  │
//! └──────────┘           └───────────┘             └──────────────┘
//!                          │       │                 │          │
//!                  lock.rs │       │ notify.rs       │ feed/    │ download.rs
//!                          ▼       ▼                 ▼          ▼
//!                      run lock   email        fetch + parse  enclosures
//!                               store/
//!                    (feeds.conf, downloaded.log)
//! ```
//!
//! * **`store/`** — flat-file persistence: the feed registry and the
//!   download ledger, both built on a generic line store.
//! * **`feed/`** — the `FeedSource` trait and the RSS implementation.
//! * **`processor`** — walks one feed's entries, downloading what the
//!   ledger hasn't seen yet.
//! * **`runner`** — one full run: lock, process, explicit finalize.
//! * **`main`** — wires everything together: parse flags, set up logging,
//!   run, map the outcome to an exit code.

mod cli;
mod config;
mod download;
mod error;
mod feed;
mod lock;
mod notify;
mod processor;
mod runner;
mod store;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use download::HttpDownloader;
use error::{Result, EXIT_LOCK_HELD};
use feed::RssSource;
use notify::{MailTransport, SmtpMailer};
use runner::RunOutcome;

/// Progress narration goes to `info`; `--cron` raises the default filter
/// so scheduled runs only emit warnings and errors.  `RUST_LOG` overrides
/// either default.
fn init_tracing(cron: bool) {
    let default = if cron { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn execute(cli: Cli) -> Result<RunOutcome> {
    let config = Config::from_cli(cli)?;
    let source = RssSource::new();
    let downloader = HttpDownloader;
    let mailer = config.mail.clone().map(SmtpMailer::new);
    let transport = mailer.as_ref().map(|m| m as &dyn MailTransport);
    runner::run(&config, &source, &downloader, transport)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.cron);

    match execute(cli) {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::AlreadyRunning) => ExitCode::from(EXIT_LOCK_HELD as u8),
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
