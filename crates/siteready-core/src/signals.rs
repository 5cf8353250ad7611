//! Reduction of page summaries into origin-level signals

use crate::answerability::{AnswerabilityClassifier, AnswerabilityMatch};
use crate::types::{Answerability, CrawlResult, PageSummary, SiteSignals};
use crate::url_utils::same_page;

/// Aggregate a crawl into rates and averages.
///
/// Presence rates and the error rate use every scanned page as denominator.
/// Text averages and answerability use only pages that were fetched
/// successfully. With no scanned pages every rate is zero and the error rate
/// is one.
pub fn aggregate(crawl: &CrawlResult, classifier: &dyn AnswerabilityClassifier) -> SiteSignals {
    let pages = &crawl.pages;
    let ok_pages: Vec<&PageSummary> = pages.iter().filter(|p| p.is_ok()).collect();

    let matches: Vec<AnswerabilityMatch> = ok_pages
        .iter()
        .map(|p| classifier.classify(&p.visible_text))
        .collect();

    SiteSignals {
        title_rate: rate(pages, |p| !p.title.is_empty()),
        h1_rate: rate(pages, |p| p.h1_count > 0),
        meta_rate: rate(pages, |p| p.has_meta_description),
        canonical_rate: rate(pages, |p| p.has_canonical_tag),
        json_ld_rate: rate(pages, |p| p.has_structured_data),
        error_rate: if pages.is_empty() {
            1.0
        } else {
            rate(pages, PageSummary::is_error)
        },
        avg_text_length: average(&ok_pages, |p| p.visible_text.chars().count() as f64),
        avg_h2_count: average(&ok_pages, |p| p.h2_count as f64),
        answerability: Answerability {
            what_rate: match_rate(&matches, |m| m.what),
            who_rate: match_rate(&matches, |m| m.who),
            how_rate: match_rate(&matches, |m| m.how),
            trust_rate: match_rate(&matches, |m| m.trust),
        },
        used_sitemap: crawl.used_sitemap,
    }
}

/// The page standing in for the homepage: the origin root, else the seed.
pub fn find_homepage<'a>(
    pages: &'a [PageSummary],
    origin: &str,
    seed: &str,
) -> Option<&'a PageSummary> {
    pages
        .iter()
        .find(|p| same_page(&p.url, origin))
        .or_else(|| pages.iter().find(|p| same_page(&p.url, seed)))
}

/// Convert a rate back into a page count.
pub fn count_of(rate: f64, total: usize) -> usize {
    (rate * total as f64).round() as usize
}

fn rate(pages: &[PageSummary], predicate: impl Fn(&PageSummary) -> bool) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    pages.iter().filter(|&p| predicate(p)).count() as f64 / pages.len() as f64
}

fn average(pages: &[&PageSummary], value: impl Fn(&PageSummary) -> f64) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    pages.iter().map(|&p| value(p)).sum::<f64>() / pages.len() as f64
}

fn match_rate(matches: &[AnswerabilityMatch], hit: impl Fn(&AnswerabilityMatch) -> bool) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    matches.iter().filter(|&m| hit(m)).count() as f64 / matches.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answerability::KeywordClassifier;

    fn page(url: &str, text: &str) -> PageSummary {
        PageSummary {
            url: url.to_string(),
            status_code: 200,
            title: "Title".to_string(),
            has_meta_description: true,
            has_canonical_tag: false,
            h1_count: 1,
            h2_count: 4,
            has_structured_data: false,
            structured_data_types: Vec::new(),
            visible_text: text.to_string(),
        }
    }

    fn crawl(pages: Vec<PageSummary>) -> CrawlResult {
        CrawlResult {
            pages,
            used_sitemap: true,
            duration_ms: 10,
        }
    }

    #[test]
    fn computes_rates_over_all_pages() {
        let mut untitled = page("https://a.test/2", "abcd");
        untitled.title.clear();
        untitled.h1_count = 0;
        let result = crawl(vec![
            page("https://a.test/", "abcdef"),
            untitled,
            PageSummary::failed("https://a.test/3"),
            page("https://a.test/4", "ab"),
        ]);

        let signals = aggregate(&result, &KeywordClassifier::default());

        assert_eq!(signals.title_rate, 0.5);
        assert_eq!(signals.h1_rate, 0.5);
        assert_eq!(signals.meta_rate, 0.75);
        assert_eq!(signals.canonical_rate, 0.0);
        assert_eq!(signals.error_rate, 0.25);
        // averages skip the failed page
        assert_eq!(signals.avg_text_length, 4.0);
        assert_eq!(signals.avg_h2_count, 4.0);
        assert!(signals.used_sitemap);
    }

    #[test]
    fn not_found_pages_count_as_errors() {
        let mut missing = page("https://a.test/gone", "Not found");
        missing.status_code = 404;
        let signals = aggregate(
            &crawl(vec![page("https://a.test/", "x"), missing]),
            &KeywordClassifier::default(),
        );
        assert_eq!(signals.error_rate, 0.5);
        assert_eq!(signals.avg_text_length, 1.0);
    }

    #[test]
    fn answerability_rates_use_fetched_pages() {
        let result = crawl(vec![
            page("https://a.test/", "We help teams. How it works."),
            page("https://a.test/b", "Trusted by many."),
            PageSummary::failed("https://a.test/c"),
        ]);

        let signals = aggregate(&result, &KeywordClassifier::default());

        assert_eq!(signals.answerability.what_rate, 0.5);
        assert_eq!(signals.answerability.how_rate, 0.5);
        assert_eq!(signals.answerability.trust_rate, 0.5);
        assert_eq!(signals.answerability.who_rate, 0.0);
    }

    #[test]
    fn empty_crawl_has_no_signal() {
        let signals = aggregate(&CrawlResult::default(), &KeywordClassifier::default());
        assert_eq!(signals.title_rate, 0.0);
        assert_eq!(signals.error_rate, 1.0);
        assert_eq!(signals.avg_text_length, 0.0);
        assert_eq!(signals.answerability.what_rate, 0.0);
    }

    #[test]
    fn homepage_prefers_origin_then_seed() {
        let pages = vec![
            page("https://a.test/about", ""),
            page("https://a.test/", ""),
        ];
        let home = find_homepage(&pages, "https://a.test", "https://a.test/about").unwrap();
        assert_eq!(home.url, "https://a.test/");

        let pages = vec![page("https://a.test/about", "")];
        let home = find_homepage(&pages, "https://a.test", "https://a.test/about").unwrap();
        assert_eq!(home.url, "https://a.test/about");

        assert!(find_homepage(&pages, "https://a.test", "https://a.test/x").is_none());
    }

    #[test]
    fn recovers_counts_from_rates() {
        assert_eq!(count_of(0.5, 10), 5);
        assert_eq!(count_of(2.0 / 3.0, 3), 2);
        assert_eq!(count_of(0.0, 0), 0);
    }
}
