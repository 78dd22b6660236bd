//! Batch orchestration.
//!
//! Drives a list of UIDs through fetch, classification, cleaning, quality
//! gating, deduplication, and output. Every per-item failure is counted and
//! the batch moves on; nothing a single message does can abort the run.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::content::{self, TextNormalizer, content_hash, is_system_generated, is_valid_content};
use crate::output::OutputSink;
use crate::pipeline::types::{ErrorKind, ProcessingStats, SkipReason};
use crate::source::MessageSource;
use crate::store::DedupStore;

pub struct BatchOrchestrator {
    normalizer: TextNormalizer,
    progress_interval: usize,
}

impl BatchOrchestrator {
    pub fn new(normalizer: TextNormalizer, progress_interval: usize) -> Self {
        Self {
            normalizer,
            progress_interval,
        }
    }

    /// Process `uids` sequentially against the given source, store, and sink.
    ///
    /// A UID already in the store is skipped without fetching. A retained
    /// message is written to the sink, its digest recorded, and only then is
    /// its UID marked processed — filtered messages stay eligible for a later
    /// run with different filters. The store is saved once at the end; a save
    /// failure lands in the cache error counter.
    pub async fn run(
        &self,
        source: &dyn MessageSource,
        store: &mut DedupStore,
        sink: &mut dyn OutputSink,
        uids: &[String],
    ) -> ProcessingStats {
        let mut stats = ProcessingStats::default();
        stats.start_processing();
        let batch_start = Instant::now();

        for uid in uids {
            if store.is_processed(uid) {
                debug!(uid = %uid, "already processed, skipping");
                stats.record_skip(SkipReason::Duplicate);
                continue;
            }

            let message = match source.fetch(uid).await {
                Ok(message) => message,
                Err(error) if error.is_timeout() => {
                    warn!(uid = %uid, %error, "timeout fetching message");
                    stats.record_error(ErrorKind::Timeout);
                    continue;
                }
                Err(error) => {
                    warn!(uid = %uid, %error, "failed to fetch message");
                    stats.record_error(ErrorKind::Fetch);
                    continue;
                }
            };

            let retained = self.process_single(uid, &message, store, sink, &mut stats);
            if retained {
                store.mark_processed(uid);
            }

            stats.total_fetched += 1;
            if self.progress_interval > 0 && stats.total_fetched % self.progress_interval == 0 {
                let elapsed = batch_start.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    stats.total_fetched as f64 / elapsed
                } else {
                    0.0
                };
                info!(
                    progress = %stats.quick_stats(),
                    rate = format!("{rate:.1}/s"),
                    "batch progress"
                );
            }
        }

        if let Err(error) = store.save() {
            warn!(%error, "failed to save dedup store");
            stats.record_error(ErrorKind::Cache);
        }

        stats.end_processing();
        stats
    }

    /// Run one message through the filters. Returns whether it was retained.
    fn process_single(
        &self,
        uid: &str,
        message: &crate::message::RawMessage,
        store: &mut DedupStore,
        sink: &mut dyn OutputSink,
        stats: &mut ProcessingStats,
    ) -> bool {
        if is_system_generated(message) {
            debug!(uid = %uid, "system-generated, skipping");
            stats.record_skip(SkipReason::System);
            return false;
        }

        // Extraction and cleaning are pure, but a panic in any stage must
        // not take down the batch.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let extraction = self.normalizer.extract_body(message);
            let cleaned = content::clean_content(&extraction.body);
            (extraction.degradations, cleaned)
        }));
        let (degradations, cleaned) = match outcome {
            Ok(parts) => parts,
            Err(_) => {
                warn!(uid = %uid, "stage panicked while processing message");
                stats.record_error(ErrorKind::Processing);
                return false;
            }
        };
        for degradation in &degradations {
            stats.record_degradation(degradation);
        }

        if !is_valid_content(&cleaned) {
            debug!(uid = %uid, "below quality threshold, skipping");
            stats.record_skip(SkipReason::LowQuality);
            return false;
        }

        let hash = content_hash(&cleaned);
        if store.is_duplicate_hash(&hash) {
            debug!(uid = %uid, hash = %&hash[..8], "duplicate content, skipping");
            stats.record_skip(SkipReason::Duplicate);
            return false;
        }

        stats.retained += 1;
        if let Err(error) = sink.write_entry(&cleaned) {
            // The message still counts as retained; only the write is lost.
            warn!(uid = %uid, %error, "failed to write retained content");
            stats.record_error(ErrorKind::Output);
        }
        store.add_hash(&hash);

        true
    }
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), 100)
    }
}

/// Best-effort persistence for an interrupted run: save the dedup store and
/// finalize the sink, logging failures instead of returning them.
pub fn persist_on_abort(store: &DedupStore, sink: &mut dyn OutputSink) {
    if let Err(error) = store.save() {
        warn!(%error, "failed to save dedup store during shutdown");
    }
    if let Err(error) = sink.finalize() {
        warn!(%error, "failed to finalize output during shutdown");
    }
}
