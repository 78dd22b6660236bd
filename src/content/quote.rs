//! Quoted-reply and forwarded-block removal.
//!
//! A line-oriented two-state machine (`Normal`/`InQuote`) with a pure
//! transition function, followed by a final sweep for residual "On ... wrote:"
//! and "Forwarded message" blocks the line pass missed.

use crate::content::patterns::{
    HEADER_LINE, RESIDUAL_FORWARD, RESIDUAL_ON_WROTE, is_quote_line,
};

/// State of the line scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    /// Emitting original content.
    Normal,
    /// Inside quoted/forwarded material; lines are dropped.
    InQuote,
}

/// Pure transition function: given the current state, the current line, and
/// the next non-empty line (lookahead), decide the next state and whether the
/// current line is kept.
///
/// Re-entry rules while `InQuote`:
/// - on a blank line, probe the lookahead: if it is not itself a quote
///   introducer and its trimmed length exceeds 5, quote mode ends before it;
/// - a non-blank line longer than 10 characters that matches no quote
///   pattern, is not a bare header line, and does not start with `>` is
///   treated as original content and exits quote mode immediately.
pub fn transition(
    state: QuoteState,
    line: &str,
    lookahead: Option<&str>,
) -> (QuoteState, bool) {
    if is_quote_line(line) {
        return (QuoteState::InQuote, false);
    }

    match state {
        QuoteState::Normal => (QuoteState::Normal, true),
        QuoteState::InQuote => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if let Some(next) = lookahead {
                    if !is_quote_line(next) && next.trim().chars().count() > 5 {
                        return (QuoteState::Normal, true);
                    }
                }
                (QuoteState::InQuote, false)
            } else if trimmed.chars().count() > 10
                && !HEADER_LINE.is_match(line)
                && !trimmed.starts_with('>')
            {
                (QuoteState::Normal, true)
            } else {
                (QuoteState::InQuote, false)
            }
        }
    }
}

/// Remove quoted replies and forwarded blocks from `content`.
pub fn strip_quoted_replies(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut state = QuoteState::Normal;

    for (i, line) in lines.iter().enumerate() {
        let lookahead = lines[i + 1..]
            .iter()
            .find(|l| !l.trim().is_empty())
            .copied();
        let (next_state, keep) = transition(state, line, lookahead);
        state = next_state;
        if keep {
            kept.push(line);
        }
    }

    final_sweep(&kept.join("\n"))
}

/// Remove residual quoted blocks: from a marker line to the next
/// blank-followed-by-non-blank boundary or end of text.
fn final_sweep(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if RESIDUAL_ON_WROTE.is_match(line) || RESIDUAL_FORWARD.is_match(line) {
            i += 1;
            while i < lines.len() {
                let blank = lines[i].trim().is_empty();
                let next_non_blank = lines
                    .get(i + 1)
                    .is_some_and(|n| !n.trim().is_empty());
                if blank && next_non_blank {
                    break;
                }
                i += 1;
            }
            continue;
        }
        out.push(line);
        i += 1;
    }

    out.join("\n")
}
