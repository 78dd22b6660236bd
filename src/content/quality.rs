//! Content quality gate.
//!
//! Composite heuristics a cleaned body must clear to count as meaningful
//! content: word count, character composition, sentence structure, word
//! repetition, spam phrases, and average word length. All thresholds are
//! fixed carry-overs from the original heuristics.

use std::collections::HashSet;

use crate::content::patterns::SPAM_PATTERNS;

/// Minimum word count.
const MIN_WORDS: usize = 20;

/// Minimum ratio of alphabetic characters (excluding whitespace).
const MIN_ALPHA_RATIO: f64 = 0.4;

/// Word count above which missing sentence punctuation rejects content.
const SENTENCE_CHECK_WORDS: usize = 50;

/// Minimum ratio of distinct words (among words longer than 2 chars).
const MIN_UNIQUENESS: f64 = 0.3;

/// Spam-phrase matches at or above this count reject content.
const SPAM_MATCH_LIMIT: usize = 2;

/// Acceptable average word length range.
const MIN_AVG_WORD_LEN: f64 = 2.5;
const MAX_AVG_WORD_LEN: f64 = 15.0;

/// Why the quality gate rejected a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityVerdict {
    Accepted,
    TooShort,
    MostlyNonAlphabetic,
    NoSentenceStructure,
    TooRepetitive,
    SpamPhrases,
    AbnormalWordLength,
}

impl QualityVerdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Whether `content` passes the quality gate.
pub fn is_valid_content(content: &str) -> bool {
    classify(content).is_accepted()
}

/// Run the full quality check, reporting which heuristic rejected.
pub fn classify(content: &str) -> QualityVerdict {
    let cleaned = content.trim();
    if cleaned.is_empty() {
        return QualityVerdict::TooShort;
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let word_count = words.len();

    if word_count < MIN_WORDS {
        return QualityVerdict::TooShort;
    }

    // Mostly non-alphabetic content is likely encoded or corrupted.
    let alpha_chars = cleaned.chars().filter(|c| c.is_alphabetic()).count();
    let total_chars = cleaned
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n'))
        .count();
    if total_chars > 0 {
        let alpha_ratio = alpha_chars as f64 / total_chars as f64;
        if alpha_ratio < MIN_ALPHA_RATIO {
            return QualityVerdict::MostlyNonAlphabetic;
        }
    }

    let sentence_endings = cleaned.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
    if sentence_endings == 0 && word_count > SENTENCE_CHECK_WORDS {
        return QualityVerdict::NoSentenceStructure;
    }

    // Repetition check over words longer than two characters.
    if word_count >= 10 {
        let long_words: Vec<&&str> = words.iter().filter(|w| w.chars().count() > 2).collect();
        if !long_words.is_empty() {
            let unique: HashSet<String> =
                long_words.iter().map(|w| w.to_lowercase()).collect();
            let uniqueness = unique.len() as f64 / long_words.len() as f64;
            if uniqueness < MIN_UNIQUENESS {
                return QualityVerdict::TooRepetitive;
            }
        }
    }

    let spam_matches = SPAM_PATTERNS
        .iter()
        .filter(|p| p.is_match(cleaned))
        .count();
    if spam_matches >= SPAM_MATCH_LIMIT {
        return QualityVerdict::SpamPhrases;
    }

    if word_count >= MIN_WORDS {
        let total_len: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg = total_len as f64 / word_count as f64;
        if !(MIN_AVG_WORD_LEN..=MAX_AVG_WORD_LEN).contains(&avg) {
            return QualityVerdict::AbnormalWordLength;
        }
    }

    QualityVerdict::Accepted
}
