//! Run configuration.
//!
//! An explicit, fully-resolved [`Config`] is built once from the parsed
//! command line and handed to each component by the caller — nothing reads
//! process-wide argument state directly.

use std::env;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// How many ledger entries to retain before evicting the oldest.
pub const DEFAULT_LEDGER_CAP: usize = 1000;

/// SMTP submission settings for the notification mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// Everything one run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub dry_run: bool,
    pub latest_only: bool,
    pub all_entries: bool,
    pub subscribe: Option<String>,
    pub ledger_cap: usize,
    pub cache_dir: PathBuf,
    pub lock_file: PathBuf,
    pub ledger_file: PathBuf,
    pub feeds_file: PathBuf,
    /// `None` disables mail notification (titles are logged instead).
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Resolve the command line into a full configuration.
    ///
    /// Subscribing implies latest-only: a freshly added feed should yield
    /// its newest episode, not its whole archive.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let pod_dir = match cli.dir.clone() {
            Some(dir) => dir,
            None => {
                let home = env::var("HOME")
                    .map_err(|_| Error::Config("HOME is not set and --dir not given".into()))?;
                PathBuf::from(home).join("podcasts")
            }
        };

        let mail = Self::mail_config(&cli)?;

        Ok(Config {
            dry_run: cli.test,
            latest_only: cli.latest || cli.subscribe.is_some(),
            all_entries: cli.all_entries,
            subscribe: cli.subscribe,
            ledger_cap: DEFAULT_LEDGER_CAP,
            cache_dir: pod_dir.join("cache"),
            lock_file: pod_dir.join("podcatch.run"),
            ledger_file: pod_dir.join("downloaded.log"),
            feeds_file: pod_dir.join("feeds.conf"),
            mail,
        })
    }

    /// Mail settings are all-or-nothing: all five present enables the
    /// notifier, none disables it, anything in between is a config error.
    fn mail_config(cli: &Cli) -> Result<Option<MailConfig>> {
        let fields = [
            &cli.smtp_relay,
            &cli.smtp_user,
            &cli.smtp_pass,
            &cli.mail_from,
            &cli.mail_to,
        ];
        let present = fields.iter().filter(|f| f.is_some()).count();
        match present {
            0 => Ok(None),
            5 => Ok(Some(MailConfig {
                relay: cli.smtp_relay.clone().unwrap_or_default(),
                username: cli.smtp_user.clone().unwrap_or_default(),
                password: cli.smtp_pass.clone().unwrap_or_default(),
                from: cli.mail_from.clone().unwrap_or_default(),
                to: cli.mail_to.clone().unwrap_or_default(),
            })),
            _ => Err(Error::Config(
                "partial SMTP configuration: set all of PODCATCH_SMTP_RELAY, \
                 PODCATCH_SMTP_USER, PODCATCH_SMTP_PASS, PODCATCH_MAIL_FROM, \
                 PODCATCH_MAIL_TO, or none"
                    .into(),
            )),
        }
    }
}
