//! Persistent deduplication store.
//!
//! Tracks processed message UIDs and retained content digests across runs in
//! a single JSON file. Saves are atomic: the new state is written to a `.tmp`
//! sibling, the previous file is rotated to `.bak`, and the temp file is
//! renamed into place. A corrupt or missing file never aborts a run — the
//! store starts empty and the cache is rebuilt.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// On-disk shape of the store. Every field defaults so a document missing
/// some of them still loads the sets it does carry; only a non-object
/// document or a field of the wrong shape discards the whole file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreRecord {
    #[serde(default)]
    processed_uids: Vec<String>,
    #[serde(default)]
    content_hashes: Vec<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    total_processed: usize,
    #[serde(default)]
    total_content_hashes: usize,
}

/// Processed-UID and content-digest sets, persisted as JSON.
#[derive(Debug)]
pub struct DedupStore {
    path: PathBuf,
    processed: HashSet<String>,
    hashes: HashSet<String>,
}

impl DedupStore {
    /// Open the store at `path`, loading any existing state.
    ///
    /// A missing file yields an empty store. A file that fails to read or
    /// parse also yields an empty store, with a warning — the run proceeds
    /// and rebuilds the cache from scratch.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (processed, hashes) = match Self::read_record(&path) {
            Ok(Some(record)) => {
                info!(
                    path = %path.display(),
                    uids = record.processed_uids.len(),
                    hashes = record.content_hashes.len(),
                    "loaded dedup store"
                );
                (
                    record.processed_uids.into_iter().collect(),
                    record.content_hashes.into_iter().collect(),
                )
            }
            Ok(None) => {
                debug!(path = %path.display(), "no dedup store on disk, starting empty");
                (HashSet::new(), HashSet::new())
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "dedup store unreadable, starting empty"
                );
                (HashSet::new(), HashSet::new())
            }
        };

        Self {
            path,
            processed,
            hashes,
        }
    }

    fn read_record(path: &Path) -> Result<Option<StoreRecord>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    // ── Membership ──────────────────────────────────────────────────

    pub fn is_processed(&self, uid: &str) -> bool {
        self.processed.contains(uid)
    }

    pub fn mark_processed(&mut self, uid: &str) {
        self.processed.insert(uid.to_string());
    }

    pub fn is_duplicate_hash(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Record a content digest. The empty sentinel digest is never stored.
    pub fn add_hash(&mut self, hash: &str) {
        if !hash.is_empty() {
            self.hashes.insert(hash.to_string());
        }
    }

    /// Snapshot of the digest set.
    pub fn content_hashes(&self) -> HashSet<String> {
        self.hashes.clone()
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn hash_count(&self) -> usize {
        self.hashes.len()
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Atomically write the store to disk.
    ///
    /// Membership arrays are sorted so saves of equal state are
    /// byte-identical and diffs stay readable.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut processed: Vec<&String> = self.processed.iter().collect();
        processed.sort();
        let mut hashes: Vec<&String> = self.hashes.iter().collect();
        hashes.sort();

        let record = StoreRecord {
            processed_uids: processed.into_iter().cloned().collect(),
            content_hashes: hashes.into_iter().cloned().collect(),
            last_updated: Some(Utc::now().to_rfc3339()),
            total_processed: self.processed.len(),
            total_content_hashes: self.hashes.len(),
        };

        let tmp = self.path.with_extension("tmp");
        let bak = self.path.with_extension("bak");

        let result = (|| -> Result<(), StoreError> {
            let json = serde_json::to_string_pretty(&record)?;
            fs::write(&tmp, json)?;

            if self.path.exists() {
                if bak.exists() {
                    fs::remove_file(&bak)?;
                }
                fs::rename(&self.path, &bak)?;
            }
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();

        if result.is_err() && tmp.exists() {
            // Best effort; the original file (or its .bak) is still intact.
            let _ = fs::remove_file(&tmp);
        }

        if result.is_ok() {
            debug!(
                path = %self.path.display(),
                uids = self.processed.len(),
                hashes = self.hashes.len(),
                "saved dedup store"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = DedupStore::open(dir.path().join("cache.json"));
        assert!(!store.is_processed("1"));
        assert_eq!(store.processed_count(), 0);
        assert_eq!(store.hash_count(), 0);
    }

    #[test]
    fn round_trips_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut store = DedupStore::open(&path);
        store.mark_processed("101");
        store.mark_processed("102");
        store.add_hash("abc123");
        store.save().unwrap();

        let reloaded = DedupStore::open(&path);
        assert!(reloaded.is_processed("101"));
        assert!(reloaded.is_processed("102"));
        assert!(!reloaded.is_processed("103"));
        assert!(reloaded.is_duplicate_hash("abc123"));
        assert!(!reloaded.is_duplicate_hash("def456"));
        assert_eq!(
            reloaded.content_hashes(),
            HashSet::from(["abc123".to_string()])
        );
    }

    #[test]
    fn corrupt_file_recovers_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not valid json").unwrap();

        let store = DedupStore::open(&path);
        assert_eq!(store.processed_count(), 0);
        assert_eq!(store.hash_count(), 0);
    }

    #[test]
    fn legacy_record_without_hashes_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"processed_uids":["7"],"last_updated":null,"total_processed":1,"total_content_hashes":0}"#,
        )
        .unwrap();

        let store = DedupStore::open(&path);
        assert!(store.is_processed("7"));
        assert_eq!(store.hash_count(), 0);
    }

    #[test]
    fn record_missing_uid_field_keeps_hashes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"content_hashes":["abc123"]}"#).unwrap();

        let store = DedupStore::open(&path);
        assert!(store.is_duplicate_hash("abc123"));
        assert_eq!(store.processed_count(), 0);
    }

    #[test]
    fn record_missing_counters_keeps_uids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"processed_uids":["7"],"content_hashes":["abc123"]}"#).unwrap();

        let store = DedupStore::open(&path);
        assert!(store.is_processed("7"));
        assert!(store.is_duplicate_hash("abc123"));
    }

    #[test]
    fn non_array_set_field_discards_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"processed_uids":5,"content_hashes":["abc123"]}"#).unwrap();

        let store = DedupStore::open(&path);
        assert_eq!(store.processed_count(), 0);
        assert_eq!(store.hash_count(), 0);
    }

    #[test]
    fn empty_digest_is_never_stored() {
        let dir = tempdir().unwrap();
        let mut store = DedupStore::open(dir.path().join("cache.json"));
        store.add_hash("");
        assert_eq!(store.hash_count(), 0);
        assert!(!store.is_duplicate_hash(""));
    }

    #[test]
    fn save_rotates_previous_file_to_bak() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut store = DedupStore::open(&path);
        store.mark_processed("1");
        store.save().unwrap();

        store.mark_processed("2");
        store.save().unwrap();

        let bak = path.with_extension("bak");
        assert!(bak.exists());
        assert!(!path.with_extension("tmp").exists());

        // The backup holds the previous generation.
        let old: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&bak).unwrap()).unwrap();
        assert_eq!(old["processed_uids"], serde_json::json!(["1"]));
    }

    #[test]
    fn saved_arrays_are_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut store = DedupStore::open(&path);
        for uid in ["30", "10", "20"] {
            store.mark_processed(uid);
        }
        store.add_hash("zzz");
        store.add_hash("aaa");
        store.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["processed_uids"], serde_json::json!(["10", "20", "30"]));
        assert_eq!(value["content_hashes"], serde_json::json!(["aaa", "zzz"]));
        assert_eq!(value["total_processed"], 3);
        assert_eq!(value["total_content_hashes"], 2);
        assert!(value["last_updated"].is_string());
    }
}
