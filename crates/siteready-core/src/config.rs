//! Crawl and cache budgets

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 6_000;
pub const DEFAULT_CRAWL_BUDGET_MS: u64 = 20_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Budgets applied to every audit.
///
/// Deserializes from partial JSON; keys that are absent keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Upper bound on scanned pages
    pub max_pages: usize,

    /// Link-traversal depth limit; the seed is depth 0
    pub max_depth: usize,

    /// Per-request timeout
    pub page_timeout_ms: u64,

    /// Total crawl time, checked before each new fetch is dispatched
    pub crawl_budget_ms: u64,

    /// How long a cached result stays fresh
    pub cache_ttl_secs: u64,

    /// Fetches in flight at once
    pub concurrency: usize,

    pub user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            page_timeout_ms: DEFAULT_PAGE_TIMEOUT_MS,
            crawl_budget_ms: DEFAULT_CRAWL_BUDGET_MS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: format!(
                "Mozilla/5.0 (compatible; siteready/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl AuditConfig {
    /// Load a config file, falling back to defaults for missing keys.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            bail!("max_pages must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.page_timeout_ms == 0 {
            bail!("page_timeout_ms must be greater than zero");
        }
        if self.crawl_budget_ms == 0 {
            bail!("crawl_budget_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn crawl_budget(&self) -> Duration {
        Duration::from_millis(self.crawl_budget_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
