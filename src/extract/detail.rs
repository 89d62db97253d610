use once_cell::sync::Lazy;
use regex::Regex;

use super::{clean_text, collect_meta, meta_value, meta_values, strip_descriptor};
use crate::error::{Error, Result};

/// Raw field strings scraped from one abstract page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    /// Identifier advertised by the page itself, without version suffix.
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub abstract_: Option<String>,
    /// e.g. `"21 Jul 2020"`
    pub submission_date: Option<String>,
    pub comments: Option<String>,
    /// e.g. `"Computation and Language (cs.CL); Machine Learning (cs.LG)"`
    pub subjects: Option<String>,
    pub journal_reference: Option<String>,
}

static TITLE_RE: Lazy<Regex> = Lazy::new(|| class_element_re("h1", "title"));
static AUTHORS_RE: Lazy<Regex> = Lazy::new(|| class_element_re("div", "authors"));
static DATELINE_RE: Lazy<Regex> = Lazy::new(|| class_element_re("div", "dateline"));
static ABSTRACT_RE: Lazy<Regex> = Lazy::new(|| class_element_re("blockquote", "abstract"));
static COMMENTS_RE: Lazy<Regex> = Lazy::new(|| class_element_re("td", "comments"));
static SUBJECTS_RE: Lazy<Regex> = Lazy::new(|| class_element_re("td", "subjects"));
static JREF_RE: Lazy<Regex> = Lazy::new(|| class_element_re("td", "jref"));

static ANCHOR_TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").unwrap());
static SUBMITTED_ON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Submitted\s+on\s+(\d{1,2}\s+[A-Za-z]+\s+\d{4})").unwrap()
});
static CANONICAL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*\brel\s*=\s*["']canonical["'][^>]*\bhref\s*=\s*["'][^"']*/abs/([^"'?#]+)["']"#)
        .unwrap()
});
static VERSION_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"v\d+$").unwrap());

/// `<tag class="... class ...">inner</tag>`, capturing `inner`.
fn class_element_re(tag: &str, class: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)<{tag}\b[^>]*\bclass\s*=\s*["'][^"']*\b{class}\b[^"']*["'][^>]*>(.*?)</{tag}>"#
    ))
    .unwrap()
}

fn inner<'h>(re: &Regex, html: &'h str) -> Option<&'h str> {
    re.captures(html).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn field(re: &Regex, html: &str) -> Option<String> {
    inner(re, html)
        .map(|frag| clean_text(&strip_descriptor(frag)))
        .filter(|s| !s.is_empty())
}

/// Scrape an arXiv abstract page.
///
/// Markup classes are read first; the `citation_*` meta tags back up the title,
/// authors and abstract. Any field may come back empty, but a page yielding none of
/// title, authors and abstract is rejected as [`Error::IllegalPage`].
pub fn extract_detail(html: &str, source: &str) -> Result<DetailFields> {
    let metas = collect_meta(html);

    let title = field(&TITLE_RE, html).or_else(|| meta_value(&metas, "citation_title"));

    let mut authors = match inner(&AUTHORS_RE, html) {
        Some(frag) => extract_authors(&strip_descriptor(frag)),
        None => Vec::new(),
    };
    if authors.is_empty() {
        authors = meta_values(&metas, "citation_author");
    }

    let abstract_ = field(&ABSTRACT_RE, html).or_else(|| meta_value(&metas, "citation_abstract"));

    if title.is_none() && authors.is_empty() && abstract_.is_none() {
        return Err(Error::IllegalPage(source.to_string()));
    }

    let submission_date = inner(&DATELINE_RE, html).and_then(|frag| {
        let text = clean_text(frag);
        SUBMITTED_ON_RE
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    });

    let identifier = meta_value(&metas, "citation_arxiv_id")
        .or_else(|| {
            CANONICAL_ID_RE
                .captures(html)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .map(|id| VERSION_SUFFIX_RE.replace(&id, "").into_owned());

    Ok(DetailFields {
        identifier,
        title,
        authors,
        abstract_,
        submission_date,
        comments: field(&COMMENTS_RE, html),
        subjects: field(&SUBJECTS_RE, html),
        journal_reference: field(&JREF_RE, html),
    })
}

fn extract_authors(fragment: &str) -> Vec<String> {
    let linked: Vec<String> = ANCHOR_TEXT_RE
        .captures_iter(fragment)
        .filter_map(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
        .collect();
    if !linked.is_empty() {
        return linked;
    }
    clean_text(fragment)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
