//! Body extraction, HTML conversion, and whitespace normalization.
//!
//! `TextNormalizer` turns a `RawMessage` into a single body string:
//! multipart messages prefer the concatenation of plain-text parts and fall
//! back to converting the HTML parts; single-part messages decode their
//! payload and convert if it is HTML. No stage here fails hard — conversion
//! problems degrade to a weaker strategy and are reported as `Degradation`s.

use tracing::warn;

use crate::content::patterns::{HTML_TAG, SCRIPT_STYLE};
use crate::message::RawMessage;

/// Render width passed to the HTML converter. Wide enough that real content
/// lines are never artificially wrapped.
const RENDER_WIDTH: usize = 500;

/// A stage that fell back to a weaker strategy while extracting a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The HTML converter failed; bare tag stripping was used instead.
    HtmlFallback,
    /// A part declared an unsupported charset; lossy UTF-8 was used.
    CharsetFallback(String),
}

/// Result of body extraction: the text plus any degradations hit on the way.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub body: String,
    pub degradations: Vec<Degradation>,
}

// ── HTML conversion ─────────────────────────────────────────────────

/// Injected HTML-to-text capability.
///
/// The real implementation renders with `html2text`; tests (or environments
/// without it) can substitute `TagStripper`. Absence of the capability is
/// explicit rather than a hidden global.
pub trait HtmlConverter: Send + Sync {
    /// Convert HTML to plain text. An `Err` makes the caller fall back to
    /// bare tag stripping.
    fn convert(&self, html: &str) -> Result<String, String>;
}

/// Full renderer: ignores hyperlink targets and images, keeps emphasis and
/// line structure.
#[derive(Debug, Default)]
pub struct Html2TextConverter;

impl HtmlConverter for Html2TextConverter {
    fn convert(&self, html: &str) -> Result<String, String> {
        Ok(html2text::from_read(html.as_bytes(), RENDER_WIDTH))
    }
}

/// Fallback converter: removes tags, keeps text as-is.
#[derive(Debug, Default)]
pub struct TagStripper;

impl HtmlConverter for TagStripper {
    fn convert(&self, html: &str) -> Result<String, String> {
        Ok(HTML_TAG.replace_all(html, "").into_owned())
    }
}

// ── Normalizer ──────────────────────────────────────────────────────

/// Extracts and normalizes body text from raw messages.
pub struct TextNormalizer {
    converter: Box<dyn HtmlConverter>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Box::new(Html2TextConverter))
    }
}

impl TextNormalizer {
    /// Create a normalizer with the given HTML conversion capability.
    pub fn new(converter: Box<dyn HtmlConverter>) -> Self {
        Self { converter }
    }

    /// Extract the body text from a message.
    ///
    /// Multipart: collect all non-attachment parts; prefer plain-text parts
    /// (joined with a blank line), else convert the joined HTML parts.
    /// Single-part: decode the payload and convert if its type is HTML.
    pub fn extract_body(&self, message: &RawMessage) -> Extraction {
        let mut degradations = Vec::new();

        let body = if message.multipart {
            let mut text_parts = Vec::new();
            let mut html_parts = Vec::new();

            for part in message.parts.iter().filter(|p| !p.is_attachment()) {
                let mime = part.mime_type.to_ascii_lowercase();
                if mime != "text/plain" && mime != "text/html" {
                    continue;
                }
                let (text, charset_fallback) = part.decode();
                if charset_fallback {
                    let label = part.charset.clone().unwrap_or_default();
                    degradations.push(Degradation::CharsetFallback(label));
                }
                if mime == "text/plain" {
                    text_parts.push(text);
                } else {
                    html_parts.push(text);
                }
            }

            if !text_parts.is_empty() {
                text_parts.join("\n\n")
            } else if !html_parts.is_empty() {
                self.convert_html(&html_parts.join("\n\n"), &mut degradations)
            } else {
                String::new()
            }
        } else {
            match message.parts.first() {
                Some(part) => {
                    let (text, charset_fallback) = part.decode();
                    if charset_fallback {
                        let label = part.charset.clone().unwrap_or_default();
                        degradations.push(Degradation::CharsetFallback(label));
                    }
                    if part.mime_type.eq_ignore_ascii_case("text/html") {
                        self.convert_html(&text, &mut degradations)
                    } else {
                        text
                    }
                }
                None => String::new(),
            }
        };

        Extraction { body, degradations }
    }

    /// Convert HTML to text, stripping script/style elements first.
    pub fn convert_html(&self, html: &str, degradations: &mut Vec<Degradation>) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        let cleaned = SCRIPT_STYLE.replace_all(html, "");
        match self.converter.convert(&cleaned) {
            Ok(text) => text,
            Err(reason) => {
                warn!(%reason, "HTML conversion failed, stripping tags instead");
                degradations.push(Degradation::HtmlFallback);
                HTML_TAG.replace_all(&cleaned, "").into_owned()
            }
        }
    }
}

// ── Whitespace policies ─────────────────────────────────────────────

/// Default whitespace policy: unify line endings, collapse runs of spaces and
/// tabs, trim each line, and drop every blank line.
pub fn normalize_whitespace(content: &str) -> String {
    normalized_lines(content)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Secondary policy: same cleanup, but consecutive blank lines are capped at
/// one so paragraph breaks survive. Trailing blank lines are removed.
pub fn normalize_paragraphs(content: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut blank_run = 0usize;

    for line in normalized_lines(content) {
        if line.is_empty() {
            blank_run += 1;
            if blank_run <= 1 {
                out.push(line);
            }
        } else {
            blank_run = 0;
            out.push(line);
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Shared per-line cleanup: CRLF/CR to LF, space/tab runs to one space,
/// trimmed lines.
fn normalized_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content.replace("\r\n", "\n").replace('\r', "\n").split('\n').map(|line| {
        let mut cleaned = String::with_capacity(line.len());
        let mut in_gap = false;
        for ch in line.chars() {
            if ch == ' ' || ch == '\t' {
                if !in_gap {
                    cleaned.push(' ');
                    in_gap = true;
                }
            } else {
                cleaned.push(ch);
                in_gap = false;
            }
        }
        cleaned.trim().to_string()
    })
    .collect::<Vec<_>>()
    .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessagePart;

    struct FailingConverter;
    impl HtmlConverter for FailingConverter {
        fn convert(&self, _html: &str) -> Result<String, String> {
            Err("renderer unavailable".into())
        }
    }

    #[test]
    fn normalize_removes_blank_lines_and_collapses_spaces() {
        let input = "first   line\r\n\r\n\tsecond\t\tline  \n\n\nthird";
        assert_eq!(normalize_whitespace(input), "first line\nsecond line\nthird");
    }

    #[test]
    fn normalize_paragraphs_caps_blank_runs_at_one() {
        let input = "para one\n\n\n\npara two\n\npara three\n\n\n";
        assert_eq!(
            normalize_paragraphs(input),
            "para one\n\npara two\n\npara three"
        );
    }

    #[test]
    fn normalize_empty_input() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_paragraphs(""), "");
    }

    #[test]
    fn multipart_prefers_plain_text_over_html() {
        let msg = crate::message::RawMessage::multipart(vec![
            MessagePart::text("text/html", "<p>html version</p>"),
            MessagePart::text("text/plain", "plain version"),
        ]);
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert_eq!(extraction.body, "plain version");
        assert!(extraction.degradations.is_empty());
    }

    #[test]
    fn multipart_joins_multiple_text_parts() {
        let msg = crate::message::RawMessage::multipart(vec![
            MessagePart::text("text/plain", "part one"),
            MessagePart::text("text/plain", "part two"),
        ]);
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert_eq!(extraction.body, "part one\n\npart two");
    }

    #[test]
    fn multipart_skips_attachments() {
        let msg = crate::message::RawMessage::multipart(vec![
            MessagePart::text("text/plain", "body text"),
            MessagePart::text("text/plain", "attached notes").as_attachment("notes.txt"),
        ]);
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert_eq!(extraction.body, "body text");
    }

    #[test]
    fn multipart_falls_back_to_html_when_no_text_parts() {
        let msg = crate::message::RawMessage::multipart(vec![MessagePart::text(
            "text/html",
            "<p>only <b>html</b> here</p>",
        )]);
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert!(extraction.body.contains("only"));
        assert!(extraction.body.contains("html"));
        assert!(!extraction.body.contains('<'));
    }

    #[test]
    fn single_part_html_is_converted() {
        let msg = crate::message::RawMessage::single_part(
            "text/html",
            "<html><body><p>converted content</p></body></html>",
        );
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert!(extraction.body.contains("converted content"));
        assert!(!extraction.body.contains("<p>"));
    }

    #[test]
    fn failing_converter_degrades_to_tag_stripping() {
        let normalizer = TextNormalizer::new(Box::new(FailingConverter));
        let msg =
            crate::message::RawMessage::single_part("text/html", "<p>still <b>readable</b></p>");
        let extraction = normalizer.extract_body(&msg);
        assert!(extraction.body.contains("still"));
        assert!(extraction.body.contains("readable"));
        assert_eq!(extraction.degradations, vec![Degradation::HtmlFallback]);
    }

    #[test]
    fn script_and_style_never_reach_output() {
        let msg = crate::message::RawMessage::single_part(
            "text/html",
            "<p>visible</p><script>alert('x')</script><style>p{}</style>",
        );
        let extraction = TextNormalizer::default().extract_body(&msg);
        assert!(extraction.body.contains("visible"));
        assert!(!extraction.body.contains("alert"));
    }

    #[test]
    fn tag_stripper_handles_plain_text() {
        assert_eq!(TagStripper.convert("no tags at all").unwrap(), "no tags at all");
    }

    #[test]
    fn html2text_converter_renders_markup() {
        let text = Html2TextConverter
            .convert("<p>alpha <b>beta</b></p>")
            .unwrap();
        assert!(text.contains("alpha"));
        assert!(text.contains("beta"));
    }
}
