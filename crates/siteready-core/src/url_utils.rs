use url::Url;

use crate::error::{AuditError, Result};

/// Normalize a URL to its origin (scheme + host + optional port).
///
/// Falls back to trimming trailing slashes if the input cannot be parsed.
pub fn normalize_origin(input: &str) -> String {
    match Url::parse(input) {
        Ok(parsed) => parsed
            .origin()
            .ascii_serialization()
            .trim_end_matches('/')
            .to_string(),
        Err(_) => input.trim_end_matches('/').to_string(),
    }
}

/// Turn a bare domain or full URL into an absolute seed URL.
///
/// A missing scheme defaults to `https://`. Only http(s) URLs with a host are
/// accepted.
pub fn normalize_seed(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidSeed("empty site URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| AuditError::InvalidSeed(format!("{trimmed}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuditError::InvalidSeed(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AuditError::InvalidSeed(format!("{trimmed}: missing host")));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Whether `url` shares `origin` (as produced by [`normalize_origin`]).
pub fn is_same_origin(url: &Url, origin: &str) -> bool {
    url.origin().ascii_serialization() == origin
}

/// Compare two URLs ignoring a trailing slash on the path.
pub fn same_page(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
