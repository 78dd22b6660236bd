//! Raw message model — the unit of input to the filtering pipeline.
//!
//! A `RawMessage` is what a `MessageSource` hands the orchestrator: headers,
//! a multipart flag, and an ordered list of parts with their MIME metadata
//! and undecoded payload bytes. Sources convert their native representation
//! (parsed `.eml`, Graph API JSON, ...) into this struct.

/// A single MIME part of a message.
#[derive(Debug, Clone)]
pub struct MessagePart {
    /// MIME type, e.g. `text/plain` or `text/html`.
    pub mime_type: String,
    /// Content-Disposition value, if any. Parts with an `attachment`
    /// disposition are skipped during body extraction.
    pub disposition: Option<String>,
    /// Declared character set, if any.
    pub charset: Option<String>,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

impl MessagePart {
    /// Create a text part with the given MIME type and UTF-8 content.
    pub fn text(mime_type: &str, content: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            disposition: None,
            charset: Some("utf-8".to_string()),
            payload: content.as_bytes().to_vec(),
        }
    }

    /// Mark this part as an attachment.
    pub fn as_attachment(mut self, filename: &str) -> Self {
        self.disposition = Some(format!("attachment; filename=\"{filename}\""));
        self
    }

    /// Whether this part is an attachment (by disposition).
    pub fn is_attachment(&self) -> bool {
        self.disposition
            .as_deref()
            .is_some_and(|d| d.to_ascii_lowercase().contains("attachment"))
    }

    /// Decode the payload to a string.
    ///
    /// Honors the declared charset for the encodings that matter in practice
    /// (UTF-8, ASCII, Latin-1 and its Windows superset); anything else falls
    /// back to lossy UTF-8. Returns the text plus a flag indicating whether
    /// the declared charset was unsupported and the fallback was used.
    pub fn decode(&self) -> (String, bool) {
        let label = self
            .charset
            .as_deref()
            .map(|c| c.trim().to_ascii_lowercase());

        match label.as_deref() {
            None | Some("utf-8") | Some("utf8") | Some("us-ascii") | Some("ascii") => {
                (String::from_utf8_lossy(&self.payload).into_owned(), false)
            }
            Some("iso-8859-1") | Some("latin1") | Some("latin-1") => {
                // Latin-1 maps each byte directly to the same code point.
                (self.payload.iter().map(|&b| b as char).collect(), false)
            }
            Some("windows-1252") | Some("cp1252") => {
                (self.payload.iter().map(|&b| cp1252_char(b)).collect(), false)
            }
            Some(_) => (String::from_utf8_lossy(&self.payload).into_owned(), true),
        }
    }
}

/// Windows-1252 characters for the 0x80..=0x9F range, where the encoding
/// replaces the C1 controls with printable punctuation (smart quotes, dashes,
/// the euro sign). Every other byte matches Latin-1.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn cp1252_char(b: u8) -> char {
    match b {
        0x80..=0x9F => CP1252_C1[(b - 0x80) as usize],
        _ => b as char,
    }
}

/// A raw message as retrieved from a mail store, pre-filter.
#[derive(Debug, Clone, Default)]
pub struct RawMessage {
    /// Subject header, if present.
    pub subject: Option<String>,
    /// Sender address (From header), if present.
    pub sender: Option<String>,
    /// Date header as a raw string, if present.
    pub date: Option<String>,
    /// Whether the message has a multipart structure.
    pub multipart: bool,
    /// Ordered body parts. Single-part messages carry exactly one entry.
    pub parts: Vec<MessagePart>,
    /// All other headers, in original order.
    headers: Vec<(String, String)>,
}

impl RawMessage {
    /// Build a single-part message from a text payload.
    pub fn single_part(mime_type: &str, content: &str) -> Self {
        Self {
            multipart: false,
            parts: vec![MessagePart::text(mime_type, content)],
            ..Default::default()
        }
    }

    /// Build a multipart message from the given parts.
    pub fn multipart(parts: Vec<MessagePart>) -> Self {
        Self::from_parts(parts, true)
    }

    /// Build a message from already-decoded parts with an explicit multipart
    /// flag, for sources that assemble parts themselves.
    pub fn from_parts(parts: Vec<MessagePart>, multipart: bool) -> Self {
        Self {
            multipart,
            parts,
            ..Default::default()
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn with_sender(mut self, sender: &str) -> Self {
        self.sender = Some(sender.to_string());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// Attach an arbitrary header (e.g. `Auto-Submitted`).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup. Returns the first matching value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let msg = RawMessage::single_part("text/plain", "hello")
            .with_header("Auto-Submitted", "auto-generated");
        assert_eq!(msg.header("auto-submitted"), Some("auto-generated"));
        assert_eq!(msg.header("AUTO-SUBMITTED"), Some("auto-generated"));
        assert_eq!(msg.header("X-Missing"), None);
    }

    #[test]
    fn from_parts_sets_multipart_flag() {
        let single = RawMessage::from_parts(vec![MessagePart::text("text/plain", "a")], false);
        assert!(!single.multipart);
        assert_eq!(single.parts.len(), 1);
        assert!(single.header("X-Anything").is_none());

        let multi = RawMessage::from_parts(
            vec![
                MessagePart::text("text/plain", "a"),
                MessagePart::text("text/html", "<p>a</p>"),
            ],
            true,
        );
        assert!(multi.multipart);
    }

    #[test]
    fn attachment_detection_by_disposition() {
        let part = MessagePart::text("text/plain", "report body").as_attachment("report.txt");
        assert!(part.is_attachment());

        let inline = MessagePart::text("text/plain", "inline body");
        assert!(!inline.is_attachment());
    }

    #[test]
    fn decode_utf8_payload() {
        let part = MessagePart::text("text/plain", "héllo wörld");
        let (text, degraded) = part.decode();
        assert_eq!(text, "héllo wörld");
        assert!(!degraded);
    }

    #[test]
    fn decode_latin1_payload() {
        let part = MessagePart {
            mime_type: "text/plain".into(),
            disposition: None,
            charset: Some("ISO-8859-1".into()),
            payload: vec![0x63, 0x61, 0x66, 0xE9], // "café" in Latin-1
        };
        let (text, degraded) = part.decode();
        assert_eq!(text, "café");
        assert!(!degraded);
    }

    #[test]
    fn decode_windows_1252_smart_punctuation() {
        let part = MessagePart {
            mime_type: "text/plain".into(),
            disposition: None,
            charset: Some("windows-1252".into()),
            // “Hi” — é
            payload: vec![0x93, 0x48, 0x69, 0x94, 0x20, 0x97, 0x20, 0xE9],
        };
        let (text, degraded) = part.decode();
        assert_eq!(text, "\u{201C}Hi\u{201D} \u{2014} é");
        assert!(!degraded);
    }

    #[test]
    fn decode_unknown_charset_falls_back_lossy() {
        let part = MessagePart {
            mime_type: "text/plain".into(),
            disposition: None,
            charset: Some("koi8-r".into()),
            payload: b"plain ascii survives".to_vec(),
        };
        let (text, degraded) = part.decode();
        assert_eq!(text, "plain ascii survives");
        assert!(degraded);
    }

    #[test]
    fn decode_invalid_utf8_is_lossy_not_fatal() {
        let part = MessagePart {
            mime_type: "text/plain".into(),
            disposition: None,
            charset: None,
            payload: vec![0x68, 0x69, 0xFF, 0xFE],
        };
        let (text, _) = part.decode();
        assert!(text.starts_with("hi"));
    }
}
