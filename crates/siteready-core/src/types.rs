//! Data model shared by the crawler, the scoring pipeline and the report

use serde::{Deserialize, Serialize};

/// 2xx and 3xx final statuses count as fetched. Links are followed from
/// these pages and only these pages feed text and answerability signals.
pub fn is_fetched_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}

/// Digest of one scanned page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// Absolute URL that was requested
    pub url: String,

    /// Final HTTP status, `0` when the fetch failed outright
    pub status_code: u16,

    pub title: String,
    pub has_meta_description: bool,
    pub has_canonical_tag: bool,
    pub h1_count: usize,
    pub h2_count: usize,

    /// At least one `application/ld+json` block was present
    pub has_structured_data: bool,

    /// Sorted `@type` names from the JSON-LD blocks that parsed
    #[serde(default)]
    pub structured_data_types: Vec<String>,

    /// Whitespace-normalized body text, truncated to a fixed cap
    pub visible_text: String,
}

impl PageSummary {
    /// Zero-signal summary recorded for a page whose fetch failed.
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 0,
            title: String::new(),
            has_meta_description: false,
            has_canonical_tag: false,
            h1_count: 0,
            h2_count: 0,
            has_structured_data: false,
            structured_data_types: Vec::new(),
            visible_text: String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        is_fetched_status(self.status_code)
    }

    /// Transport failures and 4xx/5xx responses count against the error rate.
    pub fn is_error(&self) -> bool {
        self.status_code == 0 || self.status_code >= 400
    }
}

/// Output of the discovery and fetch phase
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    pub pages: Vec<PageSummary>,
    pub used_sitemap: bool,
    pub duration_ms: u64,
}

/// Fraction of fetched pages addressing each answerability question
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answerability {
    pub what_rate: f64,
    pub who_rate: f64,
    pub how_rate: f64,
    pub trust_rate: f64,
}

/// Origin-level aggregate of every scanned page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSignals {
    pub title_rate: f64,
    pub h1_rate: f64,
    pub meta_rate: f64,
    pub canonical_rate: f64,
    pub json_ld_rate: f64,
    pub error_rate: f64,
    pub avg_text_length: f64,
    pub avg_h2_count: f64,
    pub answerability: Answerability,
    pub used_sitemap: bool,
}

/// The four axis scores plus the headline score, all in `0..=100`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditScores {
    pub ai_readiness: u8,
    pub structure: u8,
    pub content_depth: u8,
    pub technical_readiness: u8,
    pub overall: u8,
}

/// Letter grade for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// `D` and `F` are failing grades for tier purposes.
    pub fn is_failing(&self) -> bool {
        matches!(self, Grade::D | Grade::F)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditGrades {
    pub ai_readiness: Grade,
    pub structure: Grade,
    pub content_depth: Grade,
    pub technical_readiness: Grade,
    pub overall: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
        };
        f.write_str(name)
    }
}

/// Narrative for one score axis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisExplanation {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanations {
    pub tier_why: Vec<String>,
    pub ai_readiness: AxisExplanation,
    pub structure: AxisExplanation,
    pub content_depth: AxisExplanation,
    pub technical_readiness: AxisExplanation,
}

/// Recommendation priority, ordered most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// One remediation action produced by the rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Identifier of the rule that fired
    pub id: String,
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub recommendation: String,
    pub impact: String,
    pub effort: Effort,
}

/// What was scanned and how long it took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditScope {
    pub max_pages: usize,
    pub scanned_pages: usize,
    pub used_sitemap: bool,
    pub duration_ms: u64,
}

/// Self-contained audit of one origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Origin that was audited
    pub url: String,
    pub scope: AuditScope,
    pub scores: AuditScores,
    pub grades: AuditGrades,
    pub tier: Tier,
    pub explanations: Explanations,
    pub recommendations: Vec<Recommendation>,
    pub signals: SiteSignals,
}
