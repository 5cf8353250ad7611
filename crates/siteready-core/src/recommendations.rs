//! Rule-based remediation advice
//!
//! A fixed, ordered table of rules is evaluated against the site signals.
//! Every matching rule contributes one recommendation; the list is then
//! stably sorted by priority. Extend by appending rows.

use std::collections::HashSet;

use crate::types::{Effort, Priority, Recommendation, SiteSignals};

/// One row of the rule table
pub struct Rule {
    pub id: &'static str,
    pub category: &'static str,
    pub priority: Priority,
    pub effort: Effort,
    pub issue: &'static str,
    pub recommendation: &'static str,
    pub impact: &'static str,
    pub applies: fn(&SiteSignals) -> bool,
}

impl Rule {
    fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            id: self.id.to_string(),
            priority: self.priority,
            category: self.category.to_string(),
            issue: self.issue.to_string(),
            recommendation: self.recommendation.to_string(),
            impact: self.impact.to_string(),
            effort: self.effort,
        }
    }
}

pub static RULES: &[Rule] = &[
    Rule {
        id: "high-error-rate",
        category: "Technical",
        priority: Priority::Critical,
        effort: Effort::Medium,
        issue: "A large share of scanned pages failed to load or returned error statuses",
        recommendation: "Fix broken URLs, server errors and timeouts so every linked page returns 200",
        impact: "Crawlers and answer engines cannot cite pages they cannot load",
        applies: |s| s.error_rate > 0.2,
    },
    Rule {
        id: "missing-json-ld",
        category: "Structured Data",
        priority: Priority::High,
        effort: Effort::Medium,
        issue: "Most pages lack JSON-LD structured data",
        recommendation: "Add schema.org JSON-LD (Organization, WebPage, Product, FAQPage) to page templates",
        impact: "Structured data gives answer engines unambiguous facts about your entities",
        applies: |s| s.json_ld_rate < 0.5,
    },
    Rule {
        id: "missing-titles",
        category: "Structure",
        priority: Priority::High,
        effort: Effort::Low,
        issue: "Some pages have no <title>",
        recommendation: "Give every page a unique, descriptive <title>",
        impact: "Titles are the primary label search and answer engines show for a page",
        applies: |s| s.title_rate < 0.9,
    },
    Rule {
        id: "thin-content",
        category: "Content",
        priority: Priority::High,
        effort: Effort::High,
        issue: "Pages carry little visible text",
        recommendation: "Expand key pages with substantive, specific copy that answers customer questions",
        impact: "Thin pages give answer engines nothing to quote",
        applies: |s| s.avg_text_length < 1200.0,
    },
    Rule {
        id: "unclear-offering",
        category: "AI Readiness",
        priority: Priority::High,
        effort: Effort::Low,
        issue: "Few pages state plainly what the business does",
        recommendation: "Open key pages with a direct sentence describing what you offer",
        impact: "Answer engines favor sources that define themselves in one clear sentence",
        applies: |s| s.answerability.what_rate < 0.35,
    },
    Rule {
        id: "missing-h1",
        category: "Structure",
        priority: Priority::Medium,
        effort: Effort::Low,
        issue: "Some pages have no H1 heading",
        recommendation: "Add a single H1 that names the page's topic",
        impact: "The H1 tells parsers what the page is about",
        applies: |s| s.h1_rate < 0.8,
    },
    Rule {
        id: "missing-meta-description",
        category: "Structure",
        priority: Priority::Medium,
        effort: Effort::Low,
        issue: "Some pages lack a meta description",
        recommendation: "Write a concise meta description summarizing each page",
        impact: "Meta descriptions are often used verbatim as page summaries",
        applies: |s| s.meta_rate < 0.8,
    },
    Rule {
        id: "missing-canonical",
        category: "Technical",
        priority: Priority::Medium,
        effort: Effort::Low,
        issue: "Some pages do not declare a canonical URL",
        recommendation: "Add <link rel=\"canonical\"> to every page template",
        impact: "Canonical tags consolidate duplicate URLs into one citable source",
        applies: |s| s.canonical_rate < 0.8,
    },
    Rule {
        id: "weak-audience-and-process",
        category: "AI Readiness",
        priority: Priority::Medium,
        effort: Effort::Medium,
        issue: "Pages rarely say who the offering is for or how it works",
        recommendation: "Add 'who it's for' and 'how it works' sections to key pages",
        impact: "Audience and process statements match common conversational queries",
        applies: |s| s.answerability.who_rate < 0.35 || s.answerability.how_rate < 0.35,
    },
    Rule {
        id: "weak-trust-signals",
        category: "AI Readiness",
        priority: Priority::Medium,
        effort: Effort::Medium,
        issue: "Few pages show testimonials, case studies or credentials",
        recommendation: "Publish reviews, case studies, certifications and clear policies",
        impact: "Trust signals make a source more likely to be recommended",
        applies: |s| s.answerability.trust_rate < 0.35,
    },
    Rule {
        id: "few-subheadings",
        category: "Content",
        priority: Priority::Low,
        effort: Effort::Low,
        issue: "Pages use few H2 subheadings",
        recommendation: "Break long pages into sections with descriptive H2 headings",
        impact: "Sectioned content is easier to extract as self-contained answers",
        applies: |s| s.avg_h2_count < 3.0,
    },
    Rule {
        id: "no-sitemap",
        category: "Discovery",
        priority: Priority::Low,
        effort: Effort::Low,
        issue: "No usable sitemap.xml was found",
        recommendation: "Publish a sitemap.xml listing your canonical pages",
        impact: "Sitemaps let crawlers find important pages without guessing",
        applies: |s| !s.used_sitemap,
    },
];

/// Evaluate [`RULES`] against `signals`.
pub fn recommend(signals: &SiteSignals) -> Vec<Recommendation> {
    evaluate(RULES, signals)
}

/// Evaluate an arbitrary rule table: all matches, deduplicated by id,
/// stably sorted by priority.
pub fn evaluate(rules: &[Rule], signals: &SiteSignals) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let mut out: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| (rule.applies)(signals))
        .filter(|rule| seen.insert(rule.id))
        .map(Rule::to_recommendation)
        .collect();

    out.sort_by_key(|r| r.priority);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Answerability;

    fn healthy() -> SiteSignals {
        SiteSignals {
            title_rate: 1.0,
            h1_rate: 1.0,
            meta_rate: 1.0,
            canonical_rate: 1.0,
            json_ld_rate: 1.0,
            error_rate: 0.0,
            avg_text_length: 5000.0,
            avg_h2_count: 5.0,
            answerability: Answerability {
                what_rate: 0.5,
                who_rate: 0.5,
                how_rate: 0.5,
                trust_rate: 0.5,
            },
            used_sitemap: true,
        }
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut seen = HashSet::new();
        assert!(RULES.iter().all(|r| seen.insert(r.id)));
    }

    #[test]
    fn healthy_site_gets_no_recommendations() {
        assert!(recommend(&healthy()).is_empty());
    }

    #[test]
    fn multiple_rules_fire_together() {
        let signals = SiteSignals {
            json_ld_rate: 0.0,
            error_rate: 0.5,
            ..healthy()
        };
        assert_eq!(
            ids(&recommend(&signals)),
            vec!["high-error-rate", "missing-json-ld"]
        );
    }

    #[test]
    fn sorted_by_priority_with_table_order_within_priority() {
        let signals = SiteSignals {
            used_sitemap: false,
            canonical_rate: 0.0,
            title_rate: 0.0,
            avg_text_length: 100.0,
            ..healthy()
        };
        let recs = recommend(&signals);

        assert_eq!(
            ids(&recs),
            vec!["missing-titles", "thin-content", "missing-canonical", "no-sitemap"]
        );
        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let signals = SiteSignals::default();
        let first = recommend(&signals);
        let second = recommend(&signals);
        assert_eq!(first, second);
        assert_eq!(first[0].id, "missing-json-ld");
    }

    #[test]
    fn duplicate_rows_are_collapsed() {
        let rules = [
            Rule {
                id: "dup",
                category: "Test",
                priority: Priority::Low,
                effort: Effort::Low,
                issue: "first",
                recommendation: "",
                impact: "",
                applies: |_| true,
            },
            Rule {
                id: "dup",
                category: "Test",
                priority: Priority::Critical,
                effort: Effort::Low,
                issue: "second",
                recommendation: "",
                impact: "",
                applies: |_| true,
            },
        ];
        let recs = evaluate(&rules, &healthy());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].issue, "first");
    }

    #[test]
    fn serializes_lowercase_enums() {
        let recs = recommend(&SiteSignals {
            error_rate: 1.0,
            ..healthy()
        });
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["effort"], "medium");
        assert_eq!(json["category"], "Technical");
    }
}
