//! The `audit_site` operation: cache lookup, crawl, score, explain, recommend

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::answerability::{AnswerabilityClassifier, KeywordClassifier};
use crate::cache::ResultCache;
use crate::config::AuditConfig;
use crate::discovery::SiteDiscoverer;
use crate::error::Result;
use crate::explain::build_explanations;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::recommendations::recommend;
use crate::scoring::{classify_tier, compute_scores, grade_all};
use crate::signals::{aggregate, find_homepage};
use crate::types::{AuditResult, AuditScope, CrawlResult};
use crate::url_utils::{normalize_origin, normalize_seed};

/// Audits sites, reusing results cached per origin.
pub struct SiteAuditor {
    config: AuditConfig,
    discoverer: SiteDiscoverer,
    classifier: Arc<dyn AnswerabilityClassifier>,
    cache: Arc<ResultCache>,
    // one crawl per origin at a time
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl SiteAuditor {
    /// Auditor over HTTP with keyword classification and a private cache.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        let cache = Arc::new(ResultCache::new(config.cache_ttl()));
        Ok(Self::with_parts(
            config,
            fetcher,
            Arc::new(KeywordClassifier::default()),
            cache,
        ))
    }

    pub fn with_parts(
        config: AuditConfig,
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn AnswerabilityClassifier>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            discoverer: SiteDiscoverer::new(fetcher, config.clone()),
            config,
            classifier,
            cache,
            inflight: DashMap::new(),
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Audit a bare domain or URL.
    ///
    /// Returns the cached result when one is fresh. Only an input that does
    /// not name an http(s) origin is an error; unreachable sites still yield
    /// a (low-scoring) result.
    pub async fn audit_site(&self, site: &str) -> Result<Arc<AuditResult>> {
        let seed = normalize_seed(site)?;
        let origin = normalize_origin(seed.as_str());

        if let Some(hit) = self.cache.get(&origin) {
            info!(%origin, "serving cached audit");
            return Ok(hit);
        }

        let gate = self.inflight.entry(origin.clone()).or_default().clone();
        let guard = gate.lock().await;

        // Another caller may have finished the crawl while we waited
        if let Some(hit) = self.cache.get(&origin) {
            info!(%origin, "serving audit completed by a concurrent request");
            drop(guard);
            self.release(&origin, gate);
            return Ok(hit);
        }

        let crawl = self.discoverer.crawl(&seed, &origin).await;
        let result = assemble_result(
            &crawl,
            &origin,
            seed.as_str(),
            self.config.max_pages,
            self.classifier.as_ref(),
        );
        info!(
            %origin,
            overall = result.scores.overall,
            tier = %result.tier,
            "audit complete"
        );
        let stored = self.cache.insert(origin.clone(), result);

        drop(guard);
        self.release(&origin, gate);

        Ok(stored)
    }

    /// Forget the origin lock once no other caller holds it.
    fn release(&self, origin: &str, gate: Arc<Mutex<()>>) {
        drop(gate);
        self.inflight
            .remove_if(origin, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Score, grade, explain and recommend from a finished crawl.
pub fn assemble_result(
    crawl: &CrawlResult,
    origin: &str,
    seed: &str,
    max_pages: usize,
    classifier: &dyn AnswerabilityClassifier,
) -> AuditResult {
    let signals = aggregate(crawl, classifier);

    let homepage = find_homepage(&crawl.pages, origin, seed)
        .filter(|page| page.is_ok())
        .map(|page| classifier.classify(&page.visible_text));

    let scores = compute_scores(&signals, homepage);
    let grades = grade_all(&scores);
    let tier = classify_tier(&grades);
    let explanations = build_explanations(&crawl.pages, &signals, &scores, &grades, tier);
    let recommendations = recommend(&signals);

    AuditResult {
        url: origin.to_string(),
        scope: AuditScope {
            max_pages,
            scanned_pages: crawl.pages.len(),
            used_sitemap: crawl.used_sitemap,
            duration_ms: crawl.duration_ms,
        },
        scores,
        grades,
        tier,
        explanations,
        recommendations,
        signals,
    }
}
