//! Page discovery: sitemap first, bounded link traversal as fallback
//!
//! Fetches are dispatched in waves of at most `concurrency` URLs. Each wave
//! is drawn in sorted order and its results are consumed in dispatch order,
//! so the scanned page set does not depend on which response lands first.
//! The crawl budget is checked before each wave; fetches already in flight
//! are never cancelled.

use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::AuditConfig;
use crate::error::FetchFailure;
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::parser::{extract_links, summarize_page};
use crate::sitemap::{parse_sitemap, sitemap_url};
use crate::types::{CrawlResult, PageSummary};

/// Summary of one fetch, plus the body when links may be followed from it
struct FetchOutcome {
    summary: PageSummary,
    body: Option<String>,
}

pub struct SiteDiscoverer {
    fetcher: Arc<dyn PageFetcher>,
    config: AuditConfig,
}

impl SiteDiscoverer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: AuditConfig) -> Self {
        Self { fetcher, config }
    }

    /// Discover and summarize up to `max_pages` pages of `origin`.
    pub async fn crawl(&self, seed: &Url, origin: &str) -> CrawlResult {
        let started = Instant::now();
        info!(origin, seed = %seed, "starting crawl");

        let (pages, used_sitemap) = match self.sitemap_urls(origin).await {
            Some(urls) => (self.scan_sitemap(urls, started).await, true),
            None => (self.traverse(seed, origin, started).await, false),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            origin,
            pages = pages.len(),
            used_sitemap,
            duration_ms,
            "crawl finished"
        );

        CrawlResult {
            pages,
            used_sitemap,
            duration_ms,
        }
    }

    /// Sorted same-origin sitemap URLs capped at `max_pages`, or `None` when
    /// the sitemap is unusable and traversal should take over.
    async fn sitemap_urls(&self, origin: &str) -> Option<Vec<String>> {
        let location = sitemap_url(origin);

        let page = match self.fetch_with_timeout(&location).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => {
                debug!(%location, status = page.status_code, "sitemap not available");
                return None;
            }
            Err(failure) => {
                debug!(%location, %failure, "sitemap fetch failed");
                return None;
            }
        };

        let parsed = match parse_sitemap(&page.body, origin) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(%location, error = %format!("{e:#}"), "sitemap unparsable");
                return None;
            }
        };

        if parsed.urls.is_empty() {
            debug!(
                %location,
                sitemap_type = ?parsed.sitemap_type,
                skipped = parsed.skipped,
                nested = parsed.nested_sitemaps.len(),
                "sitemap lists no pages on this origin"
            );
            return None;
        }

        let mut urls = parsed.urls;
        urls.truncate(self.config.max_pages);
        Some(urls)
    }

    async fn scan_sitemap(&self, urls: Vec<String>, started: Instant) -> Vec<PageSummary> {
        let mut pages = Vec::with_capacity(urls.len());

        for wave in urls.chunks(self.concurrency()) {
            if self.budget_spent(started, pages.len()) {
                break;
            }
            let outcomes = join_all(wave.iter().map(|url| self.fetch_page(url))).await;
            pages.extend(outcomes.into_iter().map(|outcome| outcome.summary));
        }

        pages
    }

    /// Breadth-limited traversal from the seed. The frontier is ordered, so
    /// the smallest URL is always dispatched next.
    async fn traverse(&self, seed: &Url, origin: &str, started: Instant) -> Vec<PageSummary> {
        let max_pages = self.config.max_pages;
        let mut pages = Vec::new();
        let mut frontier: BTreeMap<String, usize> = BTreeMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        frontier.insert(seed.to_string(), 0);
        seen.insert(seed.to_string());

        while pages.len() < max_pages && !frontier.is_empty() {
            if self.budget_spent(started, pages.len()) {
                break;
            }

            let room = self.concurrency().min(max_pages - pages.len());
            let wave: Vec<(String, usize)> =
                (0..room).map_while(|_| frontier.pop_first()).collect();
            let outcomes = join_all(wave.iter().map(|(url, _)| self.fetch_page(url))).await;

            for ((url, depth), outcome) in wave.into_iter().zip(outcomes) {
                if depth < self.config.max_depth {
                    if let Some(body) = outcome.body.as_deref() {
                        let queued = self.enqueue_links(
                            body,
                            &url,
                            origin,
                            depth + 1,
                            &mut frontier,
                            &mut seen,
                        );
                        debug!(%url, depth, queued, "queued links");
                    }
                }
                pages.push(outcome.summary);
            }
        }

        pages
    }

    fn enqueue_links(
        &self,
        body: &str,
        page_url: &str,
        origin: &str,
        depth: usize,
        frontier: &mut BTreeMap<String, usize>,
        seen: &mut HashSet<String>,
    ) -> usize {
        let Ok(base) = Url::parse(page_url) else {
            return 0;
        };

        let mut queued = 0;
        for link in extract_links(body, &base, origin) {
            let link = link.to_string();
            if seen.insert(link.clone()) {
                frontier.insert(link, depth);
                queued += 1;
            }
        }
        queued
    }

    /// Budget is only enforced once something has been scanned, so the seed
    /// (or first sitemap wave) is always attempted.
    fn budget_spent(&self, started: Instant, scanned: usize) -> bool {
        let spent = scanned > 0 && started.elapsed() >= self.config.crawl_budget();
        if spent {
            warn!(
                scanned,
                budget_ms = self.config.crawl_budget_ms,
                "crawl budget exhausted"
            );
        }
        spent
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    async fn fetch_with_timeout(&self, url: &str) -> Result<FetchedPage, FetchFailure> {
        match tokio::time::timeout(self.config.page_timeout(), self.fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchFailure::Timeout),
        }
    }

    async fn fetch_page(&self, url: &str) -> FetchOutcome {
        match self.fetch_with_timeout(url).await {
            Ok(page) => {
                let summary = summarize_page(url, page.status_code, &page.body);
                let body = page.is_success().then_some(page.body);
                FetchOutcome { summary, body }
            }
            Err(failure) => {
                debug!(url, %failure, "page fetch failed");
                FetchOutcome {
                    summary: PageSummary::failed(url),
                    body: None,
                }
            }
        }
    }
}
