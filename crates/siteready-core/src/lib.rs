//! # siteready-core
//!
//! Estimates how well a website is prepared to be understood and cited by
//! AI answer engines.
//!
//! This library provides:
//! - Page discovery from `sitemap.xml`, with same-origin link traversal as fallback
//! - Per-page structural summaries (titles, headings, meta tags, JSON-LD)
//! - Origin-level signals, axis scores, letter grades and a tier
//! - Plain-language explanations and prioritized recommendations
//! - A per-origin result cache with a time-to-live
//!
//! ## Example
//!
//! ```no_run
//! use siteready_core::{AuditConfig, SiteAuditor};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let auditor = SiteAuditor::new(AuditConfig::default())?;
//! let result = auditor.audit_site("example.com").await?;
//!
//! println!("{} scored {} ({})", result.url, result.scores.overall, result.tier);
//! # Ok(())
//! # }
//! ```

pub mod answerability;
pub mod auditor;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod explain;
pub mod fetcher;
pub mod parser;
pub mod recommendations;
pub mod scoring;
pub mod signals;
pub mod sitemap;
pub mod types;
pub mod url_utils;

// Re-export commonly used types
pub use answerability::{AnswerabilityClassifier, AnswerabilityMatch, KeywordClassifier};
pub use auditor::SiteAuditor;
pub use cache::ResultCache;
pub use config::AuditConfig;
pub use error::{AuditError, FetchFailure};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use types::{
    AuditGrades, AuditResult, AuditScope, AuditScores, Grade, PageSummary, Recommendation,
    SiteSignals, Tier,
};
