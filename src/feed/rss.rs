//! RSS feed source implementation.
//!
//! Fetches a feed over HTTP and normalizes it with the [`rss`] crate.
//! Parsing is split into a pure function over an already-read
//! [`rss::Channel`] so tests can exercise it without hitting the network.

use chrono::{DateTime, Utc};

use super::{Entry, Feed, FeedSource};
use crate::error::{Error, Result};

/// Fetches and parses RSS 2.0 feeds.
pub struct RssSource;

impl RssSource {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a parsed channel into a [`Feed`].
    pub fn parse_channel(channel: &rss::Channel) -> Feed {
        let entries = channel
            .items()
            .iter()
            .map(|item| {
                // Parse RFC-2822 date; gracefully degrade to None on failure.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                Entry {
                    title: item.title().unwrap_or("(untitled)").to_string(),
                    published,
                    enclosure: item.enclosure().map(|e| e.url().to_string()),
                }
            })
            .collect();

        Feed {
            title: channel.title().to_string(),
            entries,
        }
    }
}

impl FeedSource for RssSource {
    fn fetch(&self, url: &str) -> Result<Feed> {
        let fetch_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::Fetch {
            url: url.to_string(),
            source,
        };
        let body = reqwest::blocking::get(url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| fetch_err(e.into()))?;
        let channel =
            rss::Channel::read_from(body.as_ref()).map_err(|e| fetch_err(e.into()))?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
