//! Per-origin result cache with a time-to-live

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::types::AuditResult;

#[derive(Debug, Clone)]
struct CachedAudit {
    cached_at: Instant,
    result: Arc<AuditResult>,
}

/// Last audit per origin.
///
/// Entries are replaced, never mutated; readers share them through `Arc`.
/// Staleness is checked on read, there is no background sweep.
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    entries: DashMap<String, CachedAudit>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `origin`, dropping it if it has expired.
    pub fn get(&self, origin: &str) -> Option<Arc<AuditResult>> {
        self.get_at(origin, Instant::now())
    }

    fn get_at(&self, origin: &str, now: Instant) -> Option<Arc<AuditResult>> {
        let is_fresh =
            |entry: &CachedAudit| now.saturating_duration_since(entry.cached_at) < self.ttl;

        if let Some(entry) = self.entries.get(origin) {
            if is_fresh(entry.value()) {
                return Some(Arc::clone(&entry.result));
            }
        }

        // Only drop the entry if nobody replaced it in the meantime
        if self.entries.remove_if(origin, |_, entry| !is_fresh(entry)).is_some() {
            debug!(origin, "cache entry expired");
        }
        None
    }

    /// Store `result` for `origin`, replacing any previous entry.
    pub fn insert(&self, origin: impl Into<String>, result: AuditResult) -> Arc<AuditResult> {
        let result = Arc::new(result);
        self.entries.insert(
            origin.into(),
            CachedAudit {
                cached_at: Instant::now(),
                result: Arc::clone(&result),
            },
        );
        result
    }

    pub fn invalidate(&self, origin: &str) -> bool {
        self.entries.remove(origin).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::config::DEFAULT_CACHE_TTL_SECS))
    }
}
