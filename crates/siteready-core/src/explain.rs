//! Human-readable narration of signals, scores and the tier
//!
//! Everything here is derived text; nothing feeds back into scoring.

use std::collections::BTreeSet;

use crate::signals::count_of;
use crate::types::{
    AuditGrades, AuditScores, AxisExplanation, Explanations, Grade, PageSummary, SiteSignals, Tier,
};

// Narration thresholds, independent of the scoring breakpoints
const TITLE_OK: f64 = 0.9;
const H1_OK: f64 = 0.8;
const META_OK: f64 = 0.8;
const JSON_LD_OK: f64 = 0.5;
const CANONICAL_OK: f64 = 0.8;
const ERROR_OK: f64 = 0.05;
const TEXT_LENGTH_OK: f64 = 2500.0;
const H2_OK: f64 = 3.0;
const ANSWERABILITY_OK: f64 = 0.35;

pub fn build_explanations(
    pages: &[PageSummary],
    signals: &SiteSignals,
    scores: &AuditScores,
    grades: &AuditGrades,
    tier: Tier,
) -> Explanations {
    Explanations {
        tier_why: tier_why(pages, signals, scores, grades, tier),
        ai_readiness: explain_ai_readiness(pages, signals),
        structure: explain_structure(pages.len(), signals),
        content_depth: explain_content_depth(signals),
        technical_readiness: explain_technical(pages, signals),
    }
}

/// Sorts each observation into strengths or gaps.
struct Narrator {
    out: AxisExplanation,
}

impl Narrator {
    fn new() -> Self {
        Self {
            out: AxisExplanation::default(),
        }
    }

    fn observe(&mut self, ok: bool, strength: String, gap: String) {
        if ok {
            self.out.strengths.push(strength);
        } else {
            self.out.gaps.push(gap);
        }
    }

    fn finish(mut self, when_clean: &str, when_gaps: &str) -> AxisExplanation {
        let improvement = if self.out.gaps.is_empty() {
            when_clean
        } else {
            when_gaps
        };
        self.out.improvements.push(improvement.to_string());
        self.out
    }
}

fn explain_structure(total: usize, signals: &SiteSignals) -> AxisExplanation {
    let mut n = Narrator::new();

    let titled = count_of(signals.title_rate, total);
    n.observe(
        total > 0 && signals.title_rate >= TITLE_OK,
        format!("Titles are present on {titled}/{total} pages"),
        format!("Titles are missing on {}/{total} pages", total - titled),
    );

    let with_h1 = count_of(signals.h1_rate, total);
    n.observe(
        total > 0 && signals.h1_rate >= H1_OK,
        format!("An H1 heading is present on {with_h1}/{total} pages"),
        format!("{}/{total} pages have no H1 heading", total - with_h1),
    );

    let with_meta = count_of(signals.meta_rate, total);
    n.observe(
        total > 0 && signals.meta_rate >= META_OK,
        format!("Meta descriptions are present on {with_meta}/{total} pages"),
        format!("Meta descriptions are missing on {}/{total} pages", total - with_meta),
    );

    n.finish(
        "Keep titles, H1 headings and meta descriptions in place as new pages are published",
        "Give every page a descriptive title, a single H1 and a meta description summarizing it",
    )
}

fn explain_content_depth(signals: &SiteSignals) -> AxisExplanation {
    let mut n = Narrator::new();

    let avg_len = signals.avg_text_length.round() as u64;
    n.observe(
        signals.avg_text_length >= TEXT_LENGTH_OK,
        format!("Pages carry an average of {avg_len} characters of visible text"),
        format!("Pages carry only {avg_len} characters of visible text on average"),
    );

    n.observe(
        signals.avg_h2_count >= H2_OK,
        format!(
            "Content is organized with {:.1} H2 subheadings per page on average",
            signals.avg_h2_count
        ),
        format!(
            "Pages average {:.1} H2 subheadings, too few to segment answers",
            signals.avg_h2_count
        ),
    );

    n.finish(
        "Keep publishing in-depth pages broken into clearly headed sections",
        "Expand key pages with substantive copy organized under descriptive H2 sections",
    )
}

fn explain_technical(pages: &[PageSummary], signals: &SiteSignals) -> AxisExplanation {
    let total = pages.len();
    let mut n = Narrator::new();

    let with_json_ld = count_of(signals.json_ld_rate, total);
    let types: BTreeSet<&str> = pages
        .iter()
        .flat_map(|p| p.structured_data_types.iter().map(String::as_str))
        .collect();
    let type_note = if types.is_empty() {
        String::new()
    } else {
        format!(" ({})", types.into_iter().collect::<Vec<_>>().join(", "))
    };
    n.observe(
        total > 0 && signals.json_ld_rate >= JSON_LD_OK,
        format!("Structured data (JSON-LD) found on {with_json_ld}/{total} pages{type_note}"),
        format!("Structured data (JSON-LD) found on only {with_json_ld}/{total} pages{type_note}"),
    );

    let with_canonical = count_of(signals.canonical_rate, total);
    n.observe(
        total > 0 && signals.canonical_rate >= CANONICAL_OK,
        format!("Canonical tags are declared on {with_canonical}/{total} pages"),
        format!("Canonical tags are missing on {}/{total} pages", total - with_canonical),
    );

    let errors = count_of(signals.error_rate, total);
    n.observe(
        total > 0 && signals.error_rate <= ERROR_OK,
        format!("{}/{total} pages loaded without errors", total - errors),
        format!("{errors}/{total} pages failed to load or returned an error status"),
    );

    n.finish(
        "Keep structured data and canonical tags current as templates change",
        "Add JSON-LD markup and canonical tags to page templates and fix failing URLs",
    )
}

fn explain_ai_readiness(pages: &[PageSummary], signals: &SiteSignals) -> AxisExplanation {
    let fetched = pages.iter().filter(|p| p.is_ok()).count();
    let a = &signals.answerability;
    let mut n = Narrator::new();

    for (rate, topic) in [
        (a.what_rate, "what the business does"),
        (a.who_rate, "who it is for"),
        (a.how_rate, "how it works"),
        (a.trust_rate, "why it can be trusted"),
    ] {
        let hits = count_of(rate, fetched);
        n.observe(
            rate >= ANSWERABILITY_OK,
            format!("{hits}/{fetched} pages explain {topic}"),
            format!("Only {hits}/{fetched} pages explain {topic}"),
        );
    }

    n.finish(
        "Keep answer-ready copy on key pages so answer engines can quote it directly",
        "State plainly what you do, who it is for, how it works and why to trust you on key pages",
    )
}

fn tier_why(
    pages: &[PageSummary],
    signals: &SiteSignals,
    scores: &AuditScores,
    grades: &AuditGrades,
    tier: Tier,
) -> Vec<String> {
    let source = if signals.used_sitemap {
        "from the sitemap"
    } else {
        "by following links"
    };
    let mut why = vec![
        format!("Based on {} pages discovered {source}", pages.len()),
        format!(
            "Overall grade is {} (score {}), which tracks the AI-readiness score",
            grades.overall, scores.overall
        ),
    ];

    let systems = format!(
        "technical readiness is {} and content depth is {}",
        grades.technical_readiness, grades.content_depth
    );
    why.push(match (tier, grades.overall) {
        (Tier::Gold, Grade::APlus | Grade::A) => {
            format!("An overall grade of {} qualifies for Gold", grades.overall)
        }
        (Tier::Gold, _) => format!("Overall grade B earns Gold because {systems}, neither failing"),
        (Tier::Silver, Grade::B) => {
            format!(
                "Overall grade B stays at Silver because {systems}; \
                 Gold requires neither to be D or F"
            )
        }
        (Tier::Silver, _) => format!("Overall grade {} places the site in Silver", grades.overall),
        (Tier::Bronze, _) => format!(
            "Overall grade {} is below C, which places the site in Bronze",
            grades.overall
        ),
    });

    why
}
