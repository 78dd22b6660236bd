//! Auto-generated message detection.
//!
//! A message is system-generated when any one of four independent signals
//! fires: subject patterns, sender-address substrings, automation headers,
//! or automation phrases in a sample of the body. Checks run in that order
//! and short-circuit on the first hit.

use crate::content::patterns::{
    AUTOMATION_HEADERS, SYSTEM_BODY_PATTERNS, SYSTEM_SENDER_SUBSTRINGS, SYSTEM_SUBJECT_PATTERNS,
};
use crate::message::RawMessage;

/// How much of the body is inspected for automation phrases.
const BODY_SAMPLE_CHARS: usize = 500;

/// Which signal marked a message as system-generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSignal {
    Subject,
    Sender,
    Header,
    Body,
}

/// Whether `message` is auto-generated rather than human correspondence.
pub fn is_system_generated(message: &RawMessage) -> bool {
    system_signal(message).is_some()
}

/// Run the detection checks, reporting which signal fired first.
pub fn system_signal(message: &RawMessage) -> Option<SystemSignal> {
    if let Some(subject) = message.subject.as_deref() {
        let subject = subject.to_lowercase();
        if SYSTEM_SUBJECT_PATTERNS.iter().any(|p| p.is_match(&subject)) {
            return Some(SystemSignal::Subject);
        }
    }

    if let Some(sender) = message.sender.as_deref() {
        let sender = sender.to_lowercase();
        if SYSTEM_SENDER_SUBSTRINGS.iter().any(|s| sender.contains(s)) {
            return Some(SystemSignal::Sender);
        }
    }

    for name in AUTOMATION_HEADERS {
        if let Some(value) = message.header(name) {
            // Auto-Submitted: no is the one value that means "human".
            if name.eq_ignore_ascii_case("Auto-Submitted")
                && value.trim().eq_ignore_ascii_case("no")
            {
                continue;
            }
            return Some(SystemSignal::Header);
        }
    }

    let sample = body_sample(message);
    if !sample.is_empty() {
        let sample = sample.to_lowercase();
        if SYSTEM_BODY_PATTERNS.iter().any(|p| p.is_match(&sample)) {
            return Some(SystemSignal::Body);
        }
    }

    None
}

/// The first `BODY_SAMPLE_CHARS` characters of the message body: the first
/// plain-text part for multipart messages, the sole payload otherwise.
fn body_sample(message: &RawMessage) -> String {
    let part = if message.multipart {
        message
            .parts
            .iter()
            .find(|p| p.mime_type.eq_ignore_ascii_case("text/plain"))
    } else {
        message.parts.first()
    };

    match part {
        Some(part) => {
            let (text, _) = part.decode();
            text.chars().take(BODY_SAMPLE_CHARS).collect()
        }
        None => String::new(),
    }
}
