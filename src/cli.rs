//! Command-line interface.
//!
//! The flag set is small and cron-oriented.  SMTP settings are taken from
//! the environment rather than flags so credentials never show up in
//! `ps` output or crontab lines; they are still surfaced here (via clap's
//! `env` support) so `--help` documents them.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "podcatch", version, about)]
pub struct Cli {
    /// Dry run: make every decision but create no directories, download
    /// nothing, and record nothing.
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// Quiet mode for cron: suppress progress narration, keep warnings
    /// and errors.
    #[arg(long)]
    pub cron: bool,

    /// Process at most the first entry of each feed.
    #[arg(short = 'l', long = "latest")]
    pub latest: bool,

    /// Do not stop at the first already-downloaded entry; scan every
    /// entry (historical catch-up).
    #[arg(short = 'a', long = "all-entries")]
    pub all_entries: bool,

    /// Subscribe to a new feed: add URL to the feeds file and fetch only
    /// its newest entry.
    #[arg(short = 's', long = "subscribe", value_name = "URL")]
    pub subscribe: Option<String>,

    /// Podcast root directory (defaults to $HOME/podcasts).
    #[arg(long, env = "PODCATCH_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// SMTP relay host for notifications.
    #[arg(long, env = "PODCATCH_SMTP_RELAY", value_name = "HOST")]
    pub smtp_relay: Option<String>,

    /// SMTP username.
    #[arg(long, env = "PODCATCH_SMTP_USER", value_name = "USER")]
    pub smtp_user: Option<String>,

    /// SMTP password.
    #[arg(long, env = "PODCATCH_SMTP_PASS", value_name = "PASS", hide_env_values = true)]
    pub smtp_pass: Option<String>,

    /// Notification sender address.
    #[arg(long, env = "PODCATCH_MAIL_FROM", value_name = "ADDR")]
    pub mail_from: Option<String>,

    /// Notification recipient address.
    #[arg(long, env = "PODCATCH_MAIL_TO", value_name = "ADDR")]
    pub mail_to: Option<String>,
}
