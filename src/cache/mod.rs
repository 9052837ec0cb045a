use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::AnalysisResult;

/// How long a cached run stays fresh. Invalidation is purely time-based:
/// a cached result can be served even if underlying files changed within
/// the window. That trade-off is intentional and documented; switching to
/// content-hash invalidation would be a semantic change, not a fix.
fn cache_ttl() -> Duration {
    Duration::hours(1)
}

#[derive(Clone, Debug)]
struct CacheEntry {
    created: DateTime<Utc>,
    result: AnalysisResult,
}

/// Memoizes whole-run results keyed by the resolved file set. The store
/// is the pipeline's only shared mutable state; a mutex is all the
/// discipline it needs (one read at run start, one write at run end).
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key a run by its sorted resolved file list.
    pub fn key_for(files: &[PathBuf]) -> String {
        let mut sorted: Vec<&PathBuf> = files.iter().collect();
        sorted.sort();

        let mut hasher = Sha256::new();
        for path in sorted {
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// A fresh entry, or absent when the key is unknown or past the TTL.
    pub fn get(&self, key: &str) -> Option<AnalysisResult> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if Utc::now() - entry.created > cache_ttl() {
            return None;
        }
        Some(entry.result.clone())
    }

    pub fn insert(&self, key: String, result: AnalysisResult) {
        let entry = CacheEntry {
            created: Utc::now(),
            result,
        };
        self.entries.lock().insert(key, entry);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Age an entry in place. Test hook for exercising TTL expiry.
    #[cfg(test)]
    pub(crate) fn backdate(&self, key: &str, by: Duration) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.created -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AiInsights, AnalysisResult, AnalysisSummary, CodeMetrics,
    };

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            timestamp: Utc::now(),
            duration_ms: 12,
            files: vec![],
            summary: AnalysisSummary::default(),
            metrics: CodeMetrics::default(),
            issues: vec![],
            recommendations: vec![],
            insights: AiInsights::default(),
        }
    }

    #[test]
    fn test_key_ignores_input_order() {
        let forward = vec![PathBuf::from("a.js"), PathBuf::from("b.js")];
        let backward = vec![PathBuf::from("b.js"), PathBuf::from("a.js")];
        assert_eq!(ResultCache::key_for(&forward), ResultCache::key_for(&backward));
    }

    #[test]
    fn test_key_changes_with_file_set() {
        let one = vec![PathBuf::from("a.js")];
        let two = vec![PathBuf::from("a.js"), PathBuf::from("b.js")];
        assert_ne!(ResultCache::key_for(&one), ResultCache::key_for(&two));
    }

    #[test]
    fn test_fresh_entry_round_trips() {
        let cache = ResultCache::new();
        let result = sample_result();
        cache.insert("k".to_string(), result.clone());
        assert_eq!(cache.get("k"), Some(result));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = ResultCache::new();
        cache.insert("k".to_string(), sample_result());
        cache.backdate("k", Duration::hours(1) + Duration::seconds(1));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_entry_inside_ttl_survives() {
        let cache = ResultCache::new();
        cache.insert("k".to_string(), sample_result());
        cache.backdate("k", Duration::minutes(59));
        assert!(cache.get("k").is_some());
    }

    #[test]
    fn test_clear_empties_store() {
        let cache = ResultCache::new();
        cache.insert("k".to_string(), sample_result());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_missing_key_is_absent() {
        assert!(ResultCache::new().get("missing").is_none());
    }
}
