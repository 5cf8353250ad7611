//! HTML parsing: page summaries, JSON-LD detection and link extraction

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use url::Url;

use crate::types::PageSummary;
use crate::url_utils::is_same_origin;

/// Upper bound on characters kept from a page's visible text
pub const VISIBLE_TEXT_CAP: usize = 20_000;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid static selector")
}

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static META_NAMED: Lazy<Selector> = Lazy::new(|| selector("meta[name]"));
static LINK_REL: Lazy<Selector> = Lazy::new(|| selector("link[rel]"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("body"));
static SCRIPT: Lazy<Selector> = Lazy::new(|| selector("script"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Build the structural digest of one fetched page.
pub fn summarize_page(url: &str, status_code: u16, html: &str) -> PageSummary {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let has_meta_description = document.select(&META_NAMED).any(|el| {
        el.value()
            .attr("name")
            .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
    });

    let has_canonical_tag = document.select(&LINK_REL).any(|el| {
        el.value().attr("rel").is_some_and(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("canonical"))
        })
    });

    let json_ld_blocks = json_ld_blocks(&document);

    PageSummary {
        url: url.to_string(),
        status_code,
        title,
        has_meta_description,
        has_canonical_tag,
        h1_count: document.select(&H1).count(),
        h2_count: document.select(&H2).count(),
        has_structured_data: !json_ld_blocks.is_empty(),
        structured_data_types: structured_data_types(&json_ld_blocks),
        visible_text: visible_text(html),
    }
}

/// Non-empty `ld+json` script bodies, trimmed.
fn json_ld_blocks(document: &Html) -> Vec<String> {
    document
        .select(&SCRIPT)
        .filter_map(|element| {
            let script_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .unwrap_or_default();

            // Use contains() to catch variations like "application/ld+json; charset=utf-8"
            if script_type.contains("ld+json") {
                let text = element.text().collect::<String>().trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            } else {
                None
            }
        })
        .collect()
}

/// Sorted, deduplicated `@type` names across the blocks that parse as JSON.
///
/// Blocks that fail to parse are skipped; they still count as structured data.
pub fn structured_data_types(blocks: &[String]) -> Vec<String> {
    let mut types = BTreeSet::new();
    for block in blocks {
        if let Ok(parsed) = serde_json::from_str::<JsonValue>(block) {
            collect_types(&parsed, &mut types);
        }
    }
    types.into_iter().collect()
}

fn collect_types(value: &JsonValue, types: &mut BTreeSet<String>) {
    match value {
        JsonValue::Array(items) => items.iter().for_each(|item| collect_types(item, types)),
        JsonValue::Object(obj) => {
            match obj.get("@type") {
                Some(JsonValue::String(name)) => {
                    types.insert(short_type(name));
                }
                Some(JsonValue::Array(names)) => {
                    for name in names.iter().filter_map(JsonValue::as_str) {
                        types.insert(short_type(name));
                    }
                }
                _ => {}
            }
            if let Some(graph) = obj.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn short_type(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

/// Remove script, style, noscript and template blocks plus comments.
pub fn sanitize_html(html: &str) -> String {
    static RE_TAG_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?is)<script[^>]*?>[\s\S]*?</script>",
            r"(?is)<style[^>]*?>[\s\S]*?</style>",
            r"(?is)<noscript[^>]*?>[\s\S]*?</noscript>",
            r"(?is)<template[^>]*?>[\s\S]*?</template>",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("invalid block regex"))
        .collect()
    });
    static RE_COMMENT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)<!--.*?-->").expect("invalid comment regex"));

    let mut clean = html.to_string();
    for re in RE_TAG_BLOCKS.iter() {
        clean = re.replace_all(&clean, " ").into_owned();
    }

    RE_COMMENT.replace_all(&clean, " ").into_owned()
}

/// Whitespace-normalized body text with non-visible blocks stripped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(&sanitize_html(html));
    let raw = match document.select(&BODY).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };

    let normalized = WHITESPACE.replace_all(raw.trim(), " ");
    normalized.chars().take(VISIBLE_TEXT_CAP).collect()
}

/// Same-origin links from `<a href>` elements, resolved against `base`.
///
/// Fragments are stripped; fragment-only, `mailto:`, `tel:` and
/// `javascript:` hrefs are skipped. Order follows the document.
pub fn extract_links(html: &str, base: &Url, origin: &str) -> Vec<Url> {
    Html::parse_document(html)
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && !raw.starts_with('#'))
        .filter(|raw| {
            let lower = raw.to_ascii_lowercase();
            !["mailto:", "tel:", "javascript:"]
                .iter()
                .any(|scheme| lower.starts_with(scheme))
        })
        .filter_map(|raw| base.join(raw).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https") && is_same_origin(url, origin))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
            <head>
                <title>  Acme Widgets  </title>
                <meta NAME="Description" content="We make widgets">
                <link rel="canonical" href="https://acme.test/">
                <script type="application/ld+json">
                {"@context": "https://schema.org", "@type": "Organization", "name": "Acme"}
                </script>
                <style>body { color: red; }</style>
            </head>
            <body>
                <h1>Widgets</h1>
                <h2>Why</h2>
                <h2>How</h2>
                <p>We   help
                   teams build widgets.</p>
                <script>var hidden = "tracking";</script>
                <noscript>Enable JavaScript</noscript>
                <!-- comment text -->
            </body>
        </html>
    "#;

    #[test]
    fn summarizes_structure() {
        let summary = summarize_page("https://acme.test/", 200, PAGE);

        assert_eq!(summary.title, "Acme Widgets");
        assert!(summary.has_meta_description);
        assert!(summary.has_canonical_tag);
        assert_eq!(summary.h1_count, 1);
        assert_eq!(summary.h2_count, 2);
        assert!(summary.has_structured_data);
        assert_eq!(summary.structured_data_types, vec!["Organization"]);
        assert!(summary.is_ok());
    }

    #[test]
    fn visible_text_skips_hidden_blocks() {
        let text = visible_text(PAGE);

        assert!(text.contains("We help teams build widgets."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Enable JavaScript"));
        assert!(!text.contains("comment text"));
        assert!(!text.contains("  "));
    }

    #[test]
    fn visible_text_is_capped() {
        let html = format!(
            "<html><body><p>{}</p></body></html>",
            "a".repeat(VISIBLE_TEXT_CAP + 500)
        );
        assert_eq!(visible_text(&html).chars().count(), VISIBLE_TEXT_CAP);
    }

    #[test]
    fn missing_elements_yield_empty_summary_fields() {
        let summary = summarize_page("https://acme.test/x", 200, "<html><body>plain</body></html>");

        assert!(summary.title.is_empty());
        assert!(!summary.has_meta_description);
        assert!(!summary.has_canonical_tag);
        assert_eq!(summary.h1_count, 0);
        assert!(!summary.has_structured_data);
        assert_eq!(summary.visible_text, "plain");
    }

    #[test]
    fn meta_other_names_do_not_count_as_description() {
        let html = r#"<head><meta name="keywords" content="a,b"><link rel="stylesheet" href="x.css"></head>"#;
        let summary = summarize_page("https://acme.test/", 200, html);
        assert!(!summary.has_meta_description);
        assert!(!summary.has_canonical_tag);
    }

    #[test]
    fn invalid_json_ld_still_counts_as_structured_data() {
        let html = r#"<script type="application/ld+json">{"@type": "Product"</script>"#;
        let summary = summarize_page("https://acme.test/", 200, html);
        assert!(summary.has_structured_data);
        assert!(summary.structured_data_types.is_empty());
    }

    #[test]
    fn extract_json_ld_with_charset() {
        let html = r#"
            <script type="APPLICATION/LD+JSON; charset=utf-8">
            {"@type": "Product", "name": "Test"}
            </script>
            <script type="application/ld+json">   </script>
        "#;

        let blocks = json_ld_blocks(&Html::parse_document(html));
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("Test"));
    }

    #[test]
    fn collects_types_from_graphs_and_arrays() {
        let blocks = vec![
            r#"{"@graph": [{"@type": "https://schema.org/WebPage"}, {"@type": ["FAQPage", "WebPage"]}]}"#
                .to_string(),
            r#"[{"@type": "BreadcrumbList"}]"#.to_string(),
        ];

        assert_eq!(
            structured_data_types(&blocks),
            vec!["BreadcrumbList", "FAQPage", "WebPage"]
        );
    }

    #[test]
    fn extracts_same_origin_links() {
        let base = Url::parse("https://acme.test/docs/").unwrap();
        let html = r##"
            <a href="/about">About</a>
            <a href="guide#intro">Guide</a>
            <a href="https://other.test/x">Elsewhere</a>
            <a href="http://acme.test/insecure">Other scheme</a>
            <a href="#top">Top</a>
            <a href="mailto:hi@acme.test">Mail</a>
            <a href="tel:+123">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a>No href</a>
        "##;

        let links: Vec<String> = extract_links(html, &base, "https://acme.test")
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            links,
            vec!["https://acme.test/about", "https://acme.test/docs/guide"]
        );
    }
}
