//! Enclosure downloads and destination-filename helpers.

use std::fs::File;
use std::io;
use std::path::Path;

use url::Url;

use crate::error::{Error, Result};

/// Transfer boundary for enclosure payloads.
///
/// The pipeline depends on this trait so tests (and dry runs that need to
/// exercise decision logic) never touch the network or the filesystem.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Streams an enclosure over HTTP straight to its destination file.
///
/// No atomic write-then-rename: a failed transfer can leave a partial
/// file behind, which the next run will overwrite rather than resume.
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let download_err = |source: Box<dyn std::error::Error + Send + Sync>| Error::Download {
            url: url.to_string(),
            source,
        };
        let mut resp = reqwest::blocking::get(url)
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| download_err(e.into()))?;
        let mut file = File::create(dest).map_err(|e| download_err(e.into()))?;
        io::copy(&mut resp, &mut file).map_err(|e| download_err(e.into()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Last path segment of an enclosure URL, with any query string and
/// fragment already stripped by proper URL parsing.
///
/// Returns `None` for unparsable URLs or URLs with an empty path
/// (`http://host/`), which callers treat like a missing enclosure.
pub fn enclosure_basename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .last()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Characters allowed in destination filenames besides ASCII letters and
/// digits.  Everything else is dropped, not replaced.
const ALLOWED_PUNCTUATION: &str = "-_,.()'# ";

/// Strip a title down to filesystem-safe characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(*c))
        .collect()
}

/// Destination filename: the sanitized entry title plus the enclosure's
/// original extension (or bare title when the enclosure has none).
pub fn destination_name(title: &str, basename: &str) -> String {
    let stem = sanitize_title(title);
    match Path::new(basename).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
