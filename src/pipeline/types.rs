//! Batch statistics and outcome types.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::content::Degradation;

/// Which error counter a per-item failure lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Timeout,
    Processing,
    Cache,
    Output,
}

/// Why a message was filtered out instead of retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Auto-generated (bounce, auto-reply, notification, ...).
    System,
    /// Failed the content quality gate.
    LowQuality,
    /// UID already processed, or content digest already retained.
    Duplicate,
}

/// Statistics for one batch run.
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    /// Messages fetched and run through the filters (retained or not).
    pub total_fetched: usize,
    pub skipped_short: usize,
    pub skipped_duplicate: usize,
    pub skipped_system: usize,
    pub retained: usize,

    pub fetch_errors: usize,
    pub timeout_errors: usize,
    pub processing_errors: usize,
    pub cache_errors: usize,
    pub output_errors: usize,

    /// Items whose HTML conversion fell back to bare tag stripping.
    pub html_fallbacks: usize,
    /// Items with an undecodable declared charset, decoded lossily.
    pub charset_fallbacks: usize,

    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ProcessingStats {
    pub fn start_processing(&mut self) {
        self.start_time = Some(Utc::now());
    }

    pub fn end_processing(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::System => self.skipped_system += 1,
            SkipReason::LowQuality => self.skipped_short += 1,
            SkipReason::Duplicate => self.skipped_duplicate += 1,
        }
    }

    pub fn record_error(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Fetch => self.fetch_errors += 1,
            ErrorKind::Timeout => self.timeout_errors += 1,
            ErrorKind::Processing => self.processing_errors += 1,
            ErrorKind::Cache => self.cache_errors += 1,
            ErrorKind::Output => self.output_errors += 1,
        }
    }

    pub fn record_degradation(&mut self, degradation: &Degradation) {
        match degradation {
            Degradation::HtmlFallback => self.html_fallbacks += 1,
            Degradation::CharsetFallback(_) => self.charset_fallbacks += 1,
        }
    }

    pub fn total_errors(&self) -> usize {
        self.fetch_errors
            + self.timeout_errors
            + self.processing_errors
            + self.cache_errors
            + self.output_errors
    }

    /// Formatted wall-clock duration, e.g. `1h 3m 20s`, once both ends of the
    /// run have been marked.
    pub fn processing_duration(&self) -> Option<String> {
        let (start, end) = (self.start_time?, self.end_time?);
        let total = (end - start).num_seconds().max(0);
        let (hours, rest) = (total / 3600, total % 3600);
        let (minutes, seconds) = (rest / 60, rest % 60);

        Some(if hours > 0 {
            format!("{hours}h {minutes}m {seconds}s")
        } else if minutes > 0 {
            format!("{minutes}m {seconds}s")
        } else {
            format!("{seconds}s")
        })
    }

    /// One-line summary for progress logging.
    pub fn quick_stats(&self) -> String {
        format!(
            "processed: {}, retained: {}, errors: {}",
            self.total_fetched,
            self.retained,
            self.total_errors()
        )
    }

    /// Full multi-line summary for the end of a run.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "Processing Summary:\n\
             \x20 Total fetched: {}\n\
             \x20 Skipped (short): {}\n\
             \x20 Skipped (duplicate): {}\n\
             \x20 Skipped (system): {}\n\
             \x20 Retained: {}\n\
             \x20 Total errors: {}",
            self.total_fetched,
            self.skipped_short,
            self.skipped_duplicate,
            self.skipped_system,
            self.retained,
            self.total_errors()
        );

        if let Some(duration) = self.processing_duration() {
            let _ = write!(out, "\n  Processing time: {duration}");
        }

        if self.total_errors() > 0 {
            let mut details = Vec::new();
            for (label, count) in [
                ("fetch", self.fetch_errors),
                ("timeout", self.timeout_errors),
                ("processing", self.processing_errors),
                ("cache", self.cache_errors),
                ("output", self.output_errors),
            ] {
                if count > 0 {
                    details.push(format!("{label}: {count}"));
                }
            }
            let _ = write!(out, "\n  Error breakdown: {}", details.join(", "));
        }

        if self.html_fallbacks > 0 || self.charset_fallbacks > 0 {
            let _ = write!(
                out,
                "\n  Degraded extractions: html: {}, charset: {}",
                self.html_fallbacks, self.charset_fallbacks
            );
        }

        if self.total_fetched > 0 {
            let retention = self.retained as f64 / self.total_fetched as f64 * 100.0;
            let error_rate = self.total_errors() as f64 / self.total_fetched as f64 * 100.0;
            let _ = write!(out, "\n  Retention rate: {retention:.1}%");
            let _ = write!(out, "\n  Error rate: {error_rate:.1}%");
        }

        out
    }
}
