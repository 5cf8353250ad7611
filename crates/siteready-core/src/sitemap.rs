//! Parsing of `{origin}/sitemap.xml` into a page list

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use std::collections::BTreeSet;
use url::Url;

use crate::url_utils::is_same_origin;

pub const SITEMAP_PATH: &str = "sitemap.xml";

// <urlset>/<sitemapindex> at depth 1, <url>/<sitemap> at 2, their <loc> at 3
const ENTRY_DEPTH: usize = 2;
const LOC_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapType {
    Standard, // <urlset> with page URLs
    Index,    // <sitemapindex> pointing to other sitemaps
    Unknown,
}

/// Page URLs declared by a sitemap document
#[derive(Debug, Clone)]
pub struct SitemapUrls {
    pub sitemap_type: SitemapType,

    /// Same-origin page URLs, sorted and deduplicated
    pub urls: Vec<String>,

    /// Sitemaps referenced by an index (not followed)
    pub nested_sitemaps: Vec<String>,

    /// `<loc>` entries dropped as off-origin or unparsable
    pub skipped: usize,
}

/// Sitemap location for an origin.
pub fn sitemap_url(origin: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), SITEMAP_PATH)
}

/// Parse a sitemap, keeping `<url><loc>` entries on `origin`.
///
/// Only an unprefixed `<loc>` that is a direct child of `<url>` (or
/// `<sitemap>` in an index) counts; extension elements such as
/// `<image:loc>` are ignored.
/// Malformed XML is an error; off-origin or unparsable entries are skipped.
pub fn parse_sitemap(content: &str, origin: &str) -> Result<SitemapUrls> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut sitemap_type = SitemapType::Unknown;
    let mut urls = BTreeSet::new();
    let mut nested_sitemaps = Vec::new();
    let mut skipped = 0;

    let mut depth = 0usize;
    let mut in_entry = false;
    let mut loc: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| {
                format!("malformed sitemap XML at byte {}", reader.error_position())
            })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                match (depth, e.local_name().as_ref()) {
                    (1, b"urlset") => sitemap_type = SitemapType::Standard,
                    (1, b"sitemapindex") => sitemap_type = SitemapType::Index,
                    (ENTRY_DEPTH, b"url") => in_entry = sitemap_type == SitemapType::Standard,
                    (ENTRY_DEPTH, b"sitemap") => in_entry = sitemap_type == SitemapType::Index,
                    // Unprefixed only: `<image:loc>` shares the local name
                    (LOC_DEPTH, b"loc") if in_entry && e.name().as_ref() == b"loc" => {
                        loc = Some(String::new())
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::CData(e) => {
                if let Some(buf) = loc.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(buf) = loc.as_mut() {
                    push_reference(buf, &e)?;
                }
            }
            Event::End(e) => {
                match (depth, e.local_name().as_ref()) {
                    (LOC_DEPTH, b"loc") => {
                        if let Some(raw) = loc.take() {
                            let value = raw.trim();
                            match sitemap_type {
                                SitemapType::Standard => match Url::parse(value) {
                                    Ok(url) if is_same_origin(&url, origin) => {
                                        urls.insert(url.to_string());
                                    }
                                    _ => skipped += 1,
                                },
                                _ => nested_sitemaps.push(value.to_string()),
                            }
                        }
                    }
                    (ENTRY_DEPTH, _) => in_entry = false,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(SitemapUrls {
        sitemap_type,
        urls: urls.into_iter().collect(),
        nested_sitemaps,
        skipped,
    })
}

/// Append the text a `&...;` reference stands for. Unknown named entities
/// are kept verbatim.
fn push_reference(buf: &mut String, reference: &BytesRef<'_>) -> Result<()> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .context("invalid character reference in sitemap")?
    {
        buf.push(ch);
        return Ok(());
    }

    let name = String::from_utf8_lossy(reference);
    match resolve_predefined_entity(&name) {
        Some(text) => buf.push_str(text),
        None => {
            buf.push('&');
            buf.push_str(&name);
            buf.push(';');
        }
    }
    Ok(())
}
