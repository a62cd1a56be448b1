//! End-of-run email notification.
//!
//! The [`Notifier`] accumulates the titles downloaded during one run and
//! sends a single summary message at finalize time.  Nothing is persisted
//! and nothing is retried: a delivery failure is fatal to the run, but it
//! can only happen after every download has already completed.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;
use crate::error::{Error, Result};

/// Mail delivery boundary, so tests can capture the composed message.
pub trait MailTransport {
    fn send(&self, subject: &str, body: &str) -> Result<()>;
}

/// In-memory queue of titles downloaded this run.
#[derive(Default)]
pub struct Notifier {
    downloaded: Vec<String>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, title: &str) {
        self.downloaded.push(title.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.downloaded.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.downloaded
    }

    /// Send one summary message listing every recorded title.  A no-op
    /// when nothing was downloaded — an empty notification is never sent.
    pub fn flush(&self, transport: &dyn MailTransport) -> Result<()> {
        if self.downloaded.is_empty() {
            return Ok(());
        }
        let mut body = String::from("The following episodes have been downloaded:\n\n");
        for title in &self.downloaded {
            body.push_str(title);
            body.push('\n');
        }
        transport.send("Episodes downloaded", &body)
    }
}

/// Authenticated STARTTLS submission through a configured relay.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, subject: &str, body: &str) -> Result<()> {
        let notify_err =
            |source: Box<dyn std::error::Error + Send + Sync>| Error::Notify(source);

        let from: Mailbox = self.config.from.parse().map_err(|e: lettre::address::AddressError| notify_err(e.into()))?;
        let to: Mailbox = self.config.to.parse().map_err(|e: lettre::address::AddressError| notify_err(e.into()))?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| notify_err(e.into()))?;

        let mailer = SmtpTransport::starttls_relay(&self.config.relay)
            .map_err(|e| notify_err(e.into()))?
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        mailer.send(&message).map_err(|e| notify_err(e.into()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
