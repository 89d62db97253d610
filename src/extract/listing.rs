use once_cell::sync::Lazy;
use regex::Regex;

use super::clean_text;
use crate::error::{Error, Result};

static ABSTRACT_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\btitle\s*=\s*["']Abstract["'][^>]*>(.*?)</a>"#).unwrap()
});
static LISTING_CONTAINER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<dl\b").unwrap());

/// Identifiers linked from a subject listing page, in page order.
///
/// Link text such as `arXiv:2007.10866` is returned without its `arXiv:` prefix.
/// `source` only labels the error when the page has neither abstract links nor a
/// listing container.
pub fn extract_identifiers(html: &str, source: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = ABSTRACT_LINK_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| {
            let text = clean_text(m.as_str());
            text.strip_prefix("arXiv:").unwrap_or(&text).trim().to_string()
        })
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() && !LISTING_CONTAINER_RE.is_match(html) {
        return Err(Error::IllegalPage(source.to_string()));
    }
    Ok(ids)
}
