//! Opening-salutation removal.

use crate::content::patterns::GREETING_PATTERNS;

/// How many leading non-empty lines are eligible for greeting removal.
const GREETING_WINDOW: usize = 3;

/// Remove an opening greeting line.
///
/// Only the first three non-empty lines are eligible. Once a greeting line
/// has been dropped, later lines are kept even if they also look like
/// greetings.
pub fn strip_opening_greeting(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut seen = 0usize;
    let mut greeting_found = false;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            kept.push(line);
            continue;
        }
        seen += 1;
        if seen <= GREETING_WINDOW
            && !greeting_found
            && GREETING_PATTERNS.iter().any(|p| p.is_match(trimmed))
        {
            greeting_found = true;
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_named_greeting() {
        let out = strip_opening_greeting("Hi Krishna,\nThe report is attached.");
        assert_eq!(out, "The report is attached.");
    }

    #[test]
    fn removes_formal_greeting() {
        let out = strip_opening_greeting("Dear Sir or Madam,\nI am writing to enquire.");
        assert_eq!(out, "I am writing to enquire.");
    }

    #[test]
    fn removes_greeting_after_leading_blank() {
        let out = strip_opening_greeting("\nHello team,\nStatus update below.");
        assert_eq!(out, "\nStatus update below.");
    }

    #[test]
    fn only_first_three_nonempty_lines_eligible() {
        let input = "one\ntwo\nthree\nHi Bob,\nmore";
        assert_eq!(strip_opening_greeting(input), input);
    }

    #[test]
    fn blank_lines_do_not_consume_the_window() {
        let out = strip_opening_greeting("\n\n\nnote to self\nHello team,\nbody");
        assert_eq!(out, "\n\n\nnote to self\nbody");
    }

    #[test]
    fn only_first_greeting_removed() {
        // A second greeting-shaped line inside the window stays.
        let out = strip_opening_greeting("Hi Anna,\nGood morning,\nbody text");
        assert_eq!(out, "Good morning,\nbody text");
    }

    #[test]
    fn non_greeting_first_line_untouched() {
        let input = "Hi, quick question about the invoice totals\nsecond line";
        assert_eq!(strip_opening_greeting(input), input);
    }

    #[test]
    fn bare_greeting_removed() {
        assert_eq!(strip_opening_greeting("Hello\nbody"), "body");
    }

    #[test]
    fn empty_input() {
        assert_eq!(strip_opening_greeting(""), "");
    }
}
