//! Message retrieval.
//!
//! `MessageSource` is the seam between the pipeline and whatever actually
//! holds the mail. The orchestrator only ever sees UIDs and `RawMessage`s;
//! per-item fetch failures come back as `FetchError` so they can be counted
//! without aborting the batch.
//!
//! `MaildirSource` is the bundled implementation: a flat directory of `.eml`
//! files, parsed with `mail-parser`. The file stem is the UID.

use std::path::PathBuf;

use async_trait::async_trait;
use mail_parser::MessageParser;
use tracing::debug;

use crate::content::patterns::AUTOMATION_HEADERS;
use crate::error::FetchError;
use crate::message::{MessagePart, RawMessage};

/// A store of raw messages addressable by UID.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// UIDs of all messages currently in the source, in processing order.
    async fn list_uids(&self) -> Result<Vec<String>, FetchError>;

    /// Fetch a single message by UID.
    async fn fetch(&self, uid: &str) -> Result<RawMessage, FetchError>;
}

/// Local directory of `.eml` files.
pub struct MaildirSource {
    dir: PathBuf,
}

impl MaildirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, uid: &str) -> PathBuf {
        self.dir.join(format!("{uid}.eml"))
    }
}

#[async_trait]
impl MessageSource for MaildirSource {
    async fn list_uids(&self) -> Result<Vec<String>, FetchError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| FetchError::Source {
            uid: String::new(),
            reason: format!("cannot read {}: {e}", self.dir.display()),
        })?;

        let mut uids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "eml"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        uids.sort();

        debug!(dir = %self.dir.display(), count = uids.len(), "listed maildir");
        Ok(uids)
    }

    async fn fetch(&self, uid: &str) -> Result<RawMessage, FetchError> {
        let path = self.path_for(uid);
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    uid: uid.to_string(),
                }
            } else {
                FetchError::Source {
                    uid: uid.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        parse_eml(uid, &bytes)
    }
}

/// Convert raw `.eml` bytes into the pipeline's message model.
fn parse_eml(uid: &str, bytes: &[u8]) -> Result<RawMessage, FetchError> {
    let parsed = MessageParser::default()
        .parse(bytes)
        .ok_or_else(|| FetchError::Parse {
            uid: uid.to_string(),
            reason: "not a parseable RFC 5322 message".to_string(),
        })?;

    // Prefer decoded text bodies; fall back to HTML bodies only when no text
    // version exists (the pipeline converts those itself).
    let mut parts = Vec::new();
    let mut i = 0;
    while let Some(text) = parsed.body_text(i) {
        parts.push(MessagePart::text("text/plain", &text));
        i += 1;
    }
    if parts.is_empty() {
        let mut i = 0;
        while let Some(html) = parsed.body_html(i) {
            parts.push(MessagePart::text("text/html", &html));
            i += 1;
        }
    }

    let multipart = parts.len() > 1;
    let mut message = RawMessage::from_parts(parts, multipart);

    if let Some(subject) = parsed.subject() {
        message = message.with_subject(subject);
    }
    if let Some(sender) = parsed
        .from()
        .and_then(|a| a.first())
        .and_then(|a| a.address())
    {
        message = message.with_sender(sender);
    }
    if let Some(date) = parsed.date() {
        message = message.with_date(&date.to_rfc3339());
    }
    for name in AUTOMATION_HEADERS {
        if let Some(value) = parsed.header_raw(*name) {
            message = message.with_header(name, value.trim());
        }
    }

    Ok(message)
}
