//! Compiled pattern tables for the content filters.
//!
//! Every table is built once into an immutable static and shared by all
//! callers. Patterns that anchor at line start use `^` explicitly because
//! `Regex::is_match` is unanchored.

use std::sync::LazyLock;

use regex::Regex;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("pattern table entry must compile"))
        .collect()
}

// ── Quote / reply detection ─────────────────────────────────────────

/// Quote-introducer patterns: any match flags the line as the start of (or
/// part of) quoted or forwarded material.
pub static QUOTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // `>`-prefixed lines, any quoting depth, with or without indent
        r"^\s*>",
        // "On ... wrote:" in its common shapes
        r"(?i)^On .* wrote:",
        r"(?i)^On .* at .* wrote:",
        r"(?i)^On .*, .* wrote:",
        r"(?i)^\d{1,2}/\d{1,2}/\d{2,4}.*wrote:",
        r"(?i)^\w+,\s+\w+\s+\d+,\s+\d{4}.*wrote:",
        // Reply/forward header lines
        r"(?i)^\s*(From|To|Cc|Bcc|Subject|Date|Sent|Reply-To):",
        // Outlook-style markers
        r"(?i)^\s*-----Original Message-----",
        r"^\s*_{10,}",
        // Gmail-style markers
        r"(?i)^\s*On .* <.*@.*> wrote:",
        r"(?i)^\d{4}-\d{2}-\d{2} \d{2}:\d{2} GMT.*wrote:",
        // Apple Mail forwards
        r"(?i)^Begin forwarded message:",
        r"(?i)^Forwarded message:",
        r"(?i)^Message forwarded",
        // Bracketed "wrote:" variants
        r"(?i)^\s*\[.*\] wrote:",
        r"(?i)^\s*<.*@.*> wrote:",
        r#"(?i)^\s*".*" <.*@.*> wrote:"#,
        // Signature separators
        r"^\s*--\s*$",
        r"^\s*---+\s*$",
        // Mobile-client disclaimers
        r"(?i)^Sent from my ",
        r"(?i)^Get Outlook for ",
        // "wrote:" in other locales
        r"(?i)^.*\s(schrieb|escribió|écrit|scrisse):",
    ])
});

/// Generic separator lines that also open a quoted section.
pub static SEPARATOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"^\s*[-=_]{3,}\s*$", r"^\s*\*{3,}\s*$", r"^\s*#{3,}\s*$"])
});

/// Bare header line, used when deciding whether a line buried in a quoted
/// section is original content.
pub static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(From|To|Subject|Date|Sent|Cc|Bcc):").unwrap()
});

/// Residual "On ... wrote:" marker for the final sweep.
pub static RESIDUAL_ON_WROTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*On\s+.*wrote:\s*$").unwrap());

/// Residual "-- Forwarded message --" marker for the final sweep.
pub static RESIDUAL_FORWARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*-+\s*Forwarded message\s*-+").unwrap());

// ── Greetings ───────────────────────────────────────────────────────

/// Opening-salutation templates, matched against a trimmed line.
pub static GREETING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // Greeting followed by one or more name tokens
        r"(?i)^(Hi|Hello|Hey|Dear)\s+[A-Za-z][A-Za-z\s'.\-]*[,:]?\s*$",
        // Formal variants
        r"(?i)^Dear\s+(Sir|Madam|Sir\s+or\s+Madam)[,:]?\s*$",
        r"(?i)^To\s+whom\s+it\s+may\s+concern[,:]?\s*$",
        // Group greetings
        r"(?i)^(Hi|Hello|Hey)\s+(all|everyone|team|folks|guys)[,:]?\s*$",
        r"(?i)^(Hi|Hello|Hey)\s+there[,:!.]?\s*$",
        // Time-based greetings
        r"(?i)^(Good\s+morning|Good\s+afternoon|Good\s+evening)[,:]?\s*$",
        r"(?i)^(Good\s+morning|Good\s+afternoon|Good\s+evening)\s+[A-Za-z][A-Za-z\s'.\-]*[,:]?\s*$",
        // Bare greeting
        r"(?i)^(Hi|Hello|Hey)[,:]?\s*$",
        // "and"-joined multiple addressees
        r"(?i)^(Hi|Hello|Hey|Dear)\s+[A-Za-z][A-Za-z\s'.\-]*(\s+and\s+[A-Za-z][A-Za-z\s'.\-]*)+[,:]?\s*$",
    ])
});

// ── Signatures ──────────────────────────────────────────────────────

/// Signature phrases and separators, matched case-insensitively against a
/// trimmed line.
pub static SIGNATURE_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)^(Best\s+regards|Sincerely\s+yours|Regards|Sincerely)[,:]?\s*$",
        r"(?i)^(Best|Thanks|Thank\s+you|Cheers|Yours\s+truly|Yours\s+sincerely)[,:]?\s*$",
        r"(?i)^(Kind\s+regards|Warm\s+regards|With\s+regards)[,:]?\s*$",
        r"(?i)^(Best\s+wishes|Many\s+thanks|Thank\s+you\s+very\s+much)[,:]?\s*$",
        r"^\s*--\s*$",
        r"^\s*---+\s*$",
        r"^\s*_{3,}\s*$",
        r"(?i)^Sent\s+from\s+my\s+.*$",
        r"(?i)^Get\s+Outlook\s+for\s+.*$",
    ])
});

/// Name-shaped lines ("First Last", "First M. Last", "F. Last"). Matched
/// case-sensitively: the capitalization is the signal.
pub static SIGNATURE_NAMES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^[A-Z][a-z]+\s+[A-Z][a-z]+\s*$",
        r"^[A-Z][a-z]+\s+[A-Z]\.\s+[A-Z][a-z]+\s*$",
        r"^[A-Z]\.\s+[A-Z][a-z]+\s*$",
    ])
});

// ── Quality gate ────────────────────────────────────────────────────

/// Spam-phrase patterns. Two or more matches reject the content.
pub static SPAM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)click here",
        r"(?i)unsubscribe",
        r"(?i)viagra",
        r"(?i)casino",
        r"(?i)lottery",
        r"(?i)winner",
        r"(?i)congratulations.*won",
        r"(?i)urgent.*action.*required",
        r"(?i)verify.*account.*immediately",
    ])
});

// ── System-message detection ────────────────────────────────────────

/// Subject-line patterns for auto-generated mail (searched, not anchored).
pub static SYSTEM_SUBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        // Auto-replies and out of office
        r"(?i)auto.?reply",
        r"(?i)automatic.*reply",
        r"(?i)out of office",
        r"(?i)vacation.*message",
        r"(?i)away.*message",
        r"(?i)absence.*notification",
        r"(?i)currently.*unavailable",
        // Delivery notifications and bounces
        r"(?i)delivery.*notification",
        r"(?i)delivery.*status.*notification",
        r"(?i)undelivered.*mail",
        r"(?i)mail.*delivery.*failed",
        r"(?i)message.*undeliverable",
        r"(?i)bounce.*message",
        r"(?i)returned.*mail",
        r"(?i)mail.*system.*error",
        // Read receipts and confirmations
        r"(?i)read.*receipt",
        r"(?i)delivery.*receipt",
        r"(?i)message.*receipt",
        r"(?i)confirmation.*receipt",
        // System daemons and postmaster
        r"(?i)mailer.?daemon",
        r"(?i)postmaster",
        r"(?i)mail.*administrator",
        // No-reply conventions
        r"(?i)no.?reply",
        r"(?i)do.?not.?reply",
        r"(?i)donot.*reply",
        // Calendar and meeting notifications
        r"(?i)meeting.*invitation",
        r"(?i)calendar.*notification",
        r"(?i)appointment.*reminder",
        r"(?i)event.*notification",
        // Security and account alerts
        r"(?i)security.*alert",
        r"(?i)password.*reset",
        r"(?i)account.*notification",
        r"(?i)system.*notification",
        r"(?i)service.*notification",
        // Error messages
        r"(?i)error.*report",
        r"(?i)failure.*notification",
        r"(?i)warning.*message",
    ])
});

/// Sender-address substrings that mark automation.
pub const SYSTEM_SENDER_SUBSTRINGS: &[&str] = &[
    "mailer-daemon",
    "postmaster",
    "noreply",
    "no-reply",
    "donotreply",
    "do-not-reply",
    "bounce",
    "auto-reply",
    "autoreply",
    "system",
    "admin",
    "administrator",
    "notification",
    "alerts",
    "security",
    "support",
];

/// Automation headers. `Auto-Submitted` only counts when its value is not the
/// literal "no"; every other header counts on mere presence.
pub const AUTOMATION_HEADERS: &[&str] = &[
    "X-Autoreply",
    "X-Autorespond",
    "Auto-Submitted",
    "X-Auto-Response-Suppress",
    "X-Mailer-Daemon",
    "X-Failed-Recipients",
    "X-Delivery-Status",
];

/// Body-level automation phrases, checked against the first 500 characters.
pub static SYSTEM_BODY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)this.*is.*an.*automatic.*message",
        r"(?i)do.*not.*reply.*to.*this.*message",
        r"(?i)this.*message.*was.*automatically.*generated",
        r"(?i)undelivered.*mail.*returned.*to.*sender",
        r"(?i)delivery.*status.*notification",
        r"(?i)out.*of.*office.*auto.*reply",
    ])
});

// ── HTML ────────────────────────────────────────────────────────────

/// Script and style elements, removed before any HTML-to-text conversion.
pub static SCRIPT_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap());

/// Bare-tag matcher for the fallback converter.
pub static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Whether a line matches any quote-introducer or separator pattern.
pub fn is_quote_line(line: &str) -> bool {
    QUOTE_PATTERNS.iter().any(|p| p.is_match(line))
        || SEPARATOR_PATTERNS.iter().any(|p| p.is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_patterns_match_common_introducers() {
        for line in [
            "> quoted text",
            "  >> deeper quote",
            "On Mon, Jan 15, 2024 at 10:00 AM Alice <a@x.com> wrote:",
            "From: Bob <bob@example.com>",
            "-----Original Message-----",
            "Begin forwarded message:",
            "[Alice] wrote:",
            "Sent from my iPhone",
            "Am Montag schrieb:",
        ] {
            assert!(is_quote_line(line), "expected quote match: {line:?}");
        }
    }

    #[test]
    fn quote_patterns_ignore_ordinary_content() {
        for line in [
            "Let's sync on the roadmap tomorrow.",
            "The demo went well overall.",
            "I wrote the draft yesterday",
        ] {
            assert!(!is_quote_line(line), "unexpected quote match: {line:?}");
        }
    }

    #[test]
    fn separator_lines_detected() {
        assert!(is_quote_line("----"));
        assert!(is_quote_line("===="));
        assert!(is_quote_line("****"));
        assert!(is_quote_line("####"));
        assert!(!is_quote_line("--x--"));
    }

    #[test]
    fn greeting_patterns_cover_variants() {
        let greeting = |s: &str| GREETING_PATTERNS.iter().any(|p| p.is_match(s));
        assert!(greeting("Hi Krishna,"));
        assert!(greeting("Dear Sir or Madam:"));
        assert!(greeting("To whom it may concern,"));
        assert!(greeting("Hi all,"));
        assert!(greeting("Good morning Ben,"));
        assert!(greeting("Hello"));
        assert!(greeting("Hi John and Jane,"));
        assert!(!greeting("Hi, just following up on the invoice"));
    }

    #[test]
    fn signature_names_are_case_sensitive() {
        let name = |s: &str| SIGNATURE_NAMES.iter().any(|p| p.is_match(s));
        assert!(name("Kevin Lin"));
        assert!(name("Anna M. Schmidt"));
        assert!(name("J. Doe"));
        assert!(!name("kevin lin"));
        assert!(!name("meeting notes attached"));
    }

    #[test]
    fn system_subject_patterns_match() {
        let hit = |s: &str| SYSTEM_SUBJECT_PATTERNS.iter().any(|p| p.is_match(s));
        assert!(hit("out of office: back monday"));
        assert!(hit("delivery status notification (failure)"));
        assert!(hit("meeting invitation: weekly sync"));
        assert!(hit("auto-reply: vacation"));
        assert!(!hit("lunch plans for friday"));
    }

    #[test]
    fn script_style_blocks_removed() {
        let html = "<p>keep</p><script>var x = 1;</script><style>p{color:red}</style>";
        let cleaned = SCRIPT_STYLE.replace_all(html, "");
        assert_eq!(cleaned, "<p>keep</p>");
    }
}
