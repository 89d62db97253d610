//! Markup scraping for arXiv listing and abstract pages.
//!
//! Pages are scanned with regular expressions rather than a DOM; only the handful of
//! elements we read are matched.

use once_cell::sync::Lazy;
use regex::Regex;

pub mod detail;
pub mod listing;

#[derive(Debug, Clone)]
struct MetaTag {
    name: Option<String>,
    content: String,
}

static META_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?is)<meta\b[^>]*>"#).unwrap());
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-zA-Z_:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static DESCRIPTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*class\s*=\s*["'][^"']*\bdescriptor\b[^"']*["'][^>]*>.*?</span>"#)
        .unwrap()
});
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

fn collect_meta(html: &str) -> Vec<MetaTag> {
    META_TAG_RE
        .find_iter(html)
        .filter_map(|m| parse_meta_tag(m.as_str()))
        .collect()
}

fn parse_meta_tag(tag: &str) -> Option<MetaTag> {
    let mut name = None;
    let mut content = None;
    for cap in ATTR_RE.captures_iter(tag) {
        let key = &cap[1];
        let val = cap
            .get(2)
            .or_else(|| cap.get(3))
            .map(|m| m.as_str().to_string());
        if let Some(val) = val {
            match key.to_ascii_lowercase().as_str() {
                "name" => name = Some(val),
                "content" => content = Some(val),
                _ => {}
            }
        }
    }
    let content = content?;
    Some(MetaTag { name, content })
}

fn meta_value(metas: &[MetaTag], name: &str) -> Option<String> {
    metas
        .iter()
        .find(|m| m.name.as_deref() == Some(name))
        .map(|m| clean_text(&m.content))
        .filter(|v| !v.is_empty())
}

fn meta_values(metas: &[MetaTag], name: &str) -> Vec<String> {
    metas
        .iter()
        .filter(|m| m.name.as_deref() == Some(name))
        .map(|m| clean_text(&m.content))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Drop `<span class="descriptor">Label:</span>` prefixes.
fn strip_descriptor(fragment: &str) -> String {
    DESCRIPTOR_RE.replace_all(fragment, "").into_owned()
}

/// Markup fragment to plain text: tags removed, entities decoded, whitespace collapsed.
fn clean_text(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    normalize_ws(&decode_entities(&text))
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let ent = &caps[1];
            let decoded = if let Some(hex) = ent.strip_prefix("#x").or_else(|| ent.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = ent.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match ent {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_tags_and_entities() {
        let s = clean_text("<b>Fast</b>  &amp;\n <i>Furious</i> &#233;t&#xE9; &unknown;");
        assert_eq!(s, "Fast & Furious été &unknown;");
    }

    #[test]
    fn descriptor_is_removed() {
        let s = strip_descriptor(r#"<span class="descriptor">Title:</span>Attention"#);
        assert_eq!(clean_text(&s), "Attention");
    }

    #[test]
    fn meta_tags_in_either_quote_style() {
        let html = r#"<meta name="citation_title" content="A &amp; B"/>
            <meta content='Doe, Jane' name='citation_author'>
            <meta name="citation_author" content="Roe, Rick">"#;
        let metas = collect_meta(html);
        assert_eq!(meta_value(&metas, "citation_title").as_deref(), Some("A & B"));
        assert_eq!(meta_values(&metas, "citation_author"), vec!["Doe, Jane", "Roe, Rick"]);
        assert!(meta_value(&metas, "citation_doi").is_none());
    }

    #[test]
    fn normalize_ws_collapses_runs() {
        proptest::proptest!(|(words in proptest::collection::vec("[a-z]{1,8}", 1..6), sep in "[ \t\n]{1,4}")| {
            let joined = words.join(&sep);
            proptest::prop_assert_eq!(normalize_ws(&format!("  {joined}\n")), words.join(" "));
        })
    }
}
