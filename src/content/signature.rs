//! Trailing-signature removal.
//!
//! Scans backward from the end of the content. The first signature-shaped
//! line becomes the provisional cut point, then the scan extends through up
//! to five additional signature lines above it. A line with more than ten
//! words ends the search: that is substantive body content.

use crate::content::patterns::{SIGNATURE_NAMES, SIGNATURE_PHRASES};

/// Maximum number of additional lines the cut point may be pulled back.
const SIGNATURE_LOOKBACK: usize = 5;

/// Word count above which a line is treated as body content.
const SUBSTANTIAL_WORDS: usize = 10;

/// Whether a trimmed line looks like part of a signature block.
fn is_signature_line(trimmed: &str) -> bool {
    SIGNATURE_PHRASES.iter().any(|p| p.is_match(trimmed))
        || SIGNATURE_NAMES.iter().any(|p| p.is_match(trimmed))
}

/// Remove a trailing signature block, if present.
pub fn strip_signature(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut cut = lines.len();

    for i in (0..lines.len()).rev() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_signature_line(trimmed) {
            cut = i;
            let lower = i.saturating_sub(SIGNATURE_LOOKBACK);
            for j in (lower..i).rev() {
                let prev = lines[j].trim();
                if prev.is_empty() {
                    continue;
                }
                if is_signature_line(prev) {
                    cut = j;
                } else {
                    break;
                }
            }
            break;
        }

        if trimmed.split_whitespace().count() > SUBSTANTIAL_WORDS {
            break;
        }
    }

    let mut kept: Vec<&str> = lines[..cut].to_vec();
    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_closing_phrase_and_name() {
        let input = "The deployment finished without incident late last night.\n\nBest regards,\nKevin Lin";
        let out = strip_signature(input);
        assert_eq!(out, "The deployment finished without incident late last night.");
    }

    #[test]
    fn removes_separator_signature() {
        let input = "See the attached summary for details.\n--\nAlice Jones\nSent from my iPhone";
        let out = strip_signature(input);
        assert_eq!(out, "See the attached summary for details.");
    }

    #[test]
    fn removes_mobile_disclaimer() {
        let input = "Running late, start without me please everyone.\n\nSent from my Android";
        let out = strip_signature(input);
        assert_eq!(out, "Running late, start without me please everyone.");
    }

    #[test]
    fn substantive_last_line_stops_search() {
        let input = "Thanks again for coordinating the venue, catering, and schedule for the entire offsite week.";
        assert_eq!(strip_signature(input), input);
    }

    #[test]
    fn lookback_is_bounded() {
        // Six signature-shaped lines above the name: only five are pulled in.
        let input =
            "Body line stays.\nBest\nCheers\nRegards\nThanks\nSincerely\nWarm regards\nKevin Lin";
        let out = strip_signature(input);
        assert_eq!(out, "Body line stays.\nBest");
    }

    #[test]
    fn lowercase_name_is_not_a_signature() {
        let input = "Quick update before lunch today.\nkevin lin";
        assert_eq!(strip_signature(input), input);
    }

    #[test]
    fn trailing_blanks_trimmed() {
        let input = "Content line here.\n\nThanks,\nBob Smith\n\n\n";
        assert_eq!(strip_signature(input), "Content line here.");
    }

    #[test]
    fn empty_input() {
        assert_eq!(strip_signature(""), "");
    }
}
