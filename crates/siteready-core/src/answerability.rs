//! Answerability classification
//!
//! Decides whether a page's text addresses the questions an answer engine
//! asks about a business: what it does, who it serves, how it works and why
//! it can be trusted.

use serde::{Deserialize, Serialize};

/// Which answerability questions one page addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerabilityMatch {
    pub what: bool,
    pub who: bool,
    pub how: bool,
    pub trust: bool,
}

/// Strategy for classifying page text. Swappable without touching scoring.
pub trait AnswerabilityClassifier: Send + Sync {
    fn classify(&self, text: &str) -> AnswerabilityMatch;
}

pub const WHAT_KEYWORDS: &[&str] = &[
    "we help",
    "we provide",
    "we offer",
    "we build",
    "we make",
    "we specialize",
    "what we do",
    "our services",
    "our product",
    "our platform",
    "our solution",
];

pub const WHO_KEYWORDS: &[&str] = &[
    "for businesses",
    "for teams",
    "for companies",
    "for developers",
    "for small business",
    "for enterprises",
    "who we serve",
    "who it's for",
    "designed for",
    "built for",
    "ideal for",
    "our customers",
    "our clients",
];

pub const HOW_KEYWORDS: &[&str] = &[
    "how it works",
    "how we work",
    "how to",
    "our process",
    "step 1",
    "step one",
    "getting started",
    "get started",
    "in three steps",
];

pub const TRUST_KEYWORDS: &[&str] = &[
    "testimonial",
    "case study",
    "case studies",
    "reviews",
    "trusted by",
    "certified",
    "certification",
    "award",
    "years of experience",
    "guarantee",
    "privacy policy",
    "iso 27001",
    "soc 2",
];

/// Literal phrase matching over lower-cased text
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    what: Vec<String>,
    who: Vec<String>,
    how: Vec<String>,
    trust: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(WHAT_KEYWORDS, WHO_KEYWORDS, HOW_KEYWORDS, TRUST_KEYWORDS)
    }
}

impl KeywordClassifier {
    pub fn new(what: &[&str], who: &[&str], how: &[&str], trust: &[&str]) -> Self {
        Self {
            what: lower(what),
            who: lower(who),
            how: lower(how),
            trust: lower(trust),
        }
    }
}

fn lower(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

fn contains_any(text: &str, words: &[String]) -> bool {
    words.iter().any(|w| text.contains(w.as_str()))
}

impl AnswerabilityClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> AnswerabilityMatch {
        let text = text.to_lowercase();
        AnswerabilityMatch {
            what: contains_any(&text, &self.what),
            who: contains_any(&text, &self.who),
            how: contains_any(&text, &self.how),
            trust: contains_any(&text, &self.trust),
        }
    }
}
