use biblatex::{Bibliography, Entry};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    date::parse_submit_date,
    error::{Error, FormatLocation, Result},
    subject,
};

/// Field values as extracted from an abstract page, before any validation.
///
/// Every field is best-effort; missing markup leaves the field `None` (or empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub identifier: String,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub abstract_: Option<String>,
    /// Free text such as `"21 Jul 2020"`.
    pub submission_date: Option<String>,
    /// Short codes, already split out of the subject field.
    pub subjects: Vec<String>,
    pub comments: Option<String>,
    pub journal_reference: Option<String>,
}

/// A validated arXiv record.
///
/// Only obtainable through [`Article::new`] or [`Article::from_json`], both of which
/// enforce the same checks, so a value of this type always satisfies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ArticleRepr")]
pub struct Article {
    identifier: String,
    title: Option<String>,
    authors: Vec<String>,
    #[serde(rename = "abstract")]
    abstract_: String,
    submission_date: Option<NaiveDate>,
    subjects: Vec<String>,
    comments: Option<String>,
    journal_reference: Option<String>,
}

/// Serialized shape of an [`Article`], decoded before re-validation.
#[derive(Deserialize)]
struct ArticleRepr {
    identifier: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(rename = "abstract", default)]
    abstract_: Option<String>,
    #[serde(default)]
    submission_date: Option<NaiveDate>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    comments: Option<String>,
    #[serde(default)]
    journal_reference: Option<String>,
}

impl TryFrom<ArticleRepr> for Article {
    type Error = Error;

    fn try_from(r: ArticleRepr) -> Result<Self> {
        check_identifier(&r.identifier)?;
        let abstract_ = r.abstract_.ok_or(Error::Format(FormatLocation::Abstract))?;
        check_subjects(&r.subjects)?;
        check_submit_date(&r.identifier, r.submission_date)?;

        Ok(Article {
            identifier: r.identifier,
            title: r.title,
            authors: r.authors,
            abstract_,
            submission_date: r.submission_date,
            subjects: r.subjects,
            comments: r.comments,
            journal_reference: r.journal_reference,
        })
    }
}

pub(crate) fn check_identifier(identifier: &str) -> Result<()> {
    static IDX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\.\d{5}$").unwrap());
    if identifier.len() != 10 || !IDX_RE.is_match(identifier) {
        return Err(Error::Format(FormatLocation::Idx));
    }
    Ok(())
}

fn check_subjects(subjects: &[String]) -> Result<()> {
    if subjects.len() < 2 {
        return Err(Error::Format(FormatLocation::Subjects));
    }
    Ok(())
}

fn check_submit_date(identifier: &str, date: Option<NaiveDate>) -> Result<()> {
    let Some(date) = date else {
        return Ok(());
    };
    match year_month_of(identifier) {
        Some((year, month)) if date.year() == year && date.month() == month => Ok(()),
        _ => Err(Error::Format(FormatLocation::SubmitDate)),
    }
}

/// Decode the `YYMM` prefix of a new-style identifier.
fn year_month_of(identifier: &str) -> Option<(i32, u32)> {
    let yy: i32 = identifier.get(0..2)?.parse().ok()?;
    let mm: u32 = identifier.get(2..4)?.parse().ok()?;
    Some((2000 + yy, mm))
}

impl Article {
    /// Validate raw extracted fields into a record.
    ///
    /// Checks run in a fixed order and the first failure wins: identifier, abstract,
    /// subject count, then the submission date is normalised and compared against the
    /// identifier's year and month.
    pub fn new(raw: RawArticle) -> Result<Self> {
        check_identifier(&raw.identifier)?;
        let abstract_ = raw
            .abstract_
            .ok_or(Error::Format(FormatLocation::Abstract))?;
        check_subjects(&raw.subjects)?;

        let submission_date = match raw.submission_date.as_deref() {
            Some(text) => parse_submit_date(text)?,
            None => None,
        };
        check_submit_date(&raw.identifier, submission_date)?;

        Ok(Article {
            identifier: raw.identifier,
            title: raw.title,
            authors: raw.authors,
            abstract_,
            submission_date,
            subjects: raw.subjects,
            comments: raw.comments,
            journal_reference: raw.journal_reference,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn abstract_text(&self) -> &str {
        &self.abstract_
    }

    pub fn submission_date(&self) -> Option<NaiveDate> {
        self.submission_date
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn journal_reference(&self) -> Option<&str> {
        self.journal_reference.as_deref()
    }

    /// Year and month encoded in the identifier, e.g. `2007.10866` → `(2020, 7)`.
    pub fn year_month(&self) -> (i32, u32) {
        // Identifier shape is checked on construction.
        year_month_of(&self.identifier).unwrap_or_default()
    }

    pub fn abs_url(&self) -> String {
        format!("https://arxiv.org/abs/{}", self.identifier)
    }

    /// Pretty-printed JSON, fields in declaration order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a record written by [`Article::to_json`], re-running every check.
    pub fn from_json(text: &str) -> Result<Self> {
        let repr: ArticleRepr = serde_json::from_str(text)?;
        Article::try_from(repr)
    }

    /// Render as a BibLaTeX `@online` entry.
    pub fn to_biblatex(&self) -> Result<Entry> {
        let bib = self.build_biblatex();
        let bib = Bibliography::parse(&bib).map_err(|e| Error::Biblatex(e.to_string()))?;
        bib.iter()
            .next()
            .cloned()
            .ok_or_else(|| Error::Biblatex("empty bibliography".to_string()))
    }

    fn build_biblatex(&self) -> String {
        let id = &self.identifier;
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(format!("title = {{{}}}", escape_latex(title)));
        }
        if !self.authors.is_empty() {
            let authors = self
                .authors
                .iter()
                .map(|a| escape_latex(a))
                .collect::<Vec<_>>()
                .join(" and ");
            fields.push(format!("author = {{{}}}", authors));
        }
        fields.push(format!("abstract = {{{}}}", escape_latex(&self.abstract_)));
        match self.submission_date {
            Some(d) => fields.push(format!("date = {{{}}}", d.format("%Y-%m-%d"))),
            None => {
                let (year, month) = self.year_month();
                fields.push(format!("date = {{{:04}-{:02}}}", year, month));
            }
        }
        fields.push(format!("url = {{{}}}", self.abs_url()));
        fields.push("eprinttype = {arXiv}".to_string());
        fields.push(format!("eprint = {{{}}}", id));
        if let Some(primary) = self.subjects.first() {
            fields.push(format!("eprintclass = {{{}}}", primary));
        }
        let keywords = self
            .subjects
            .iter()
            .map(|code| match subject::name(code) {
                Some(name) => format!("Computer Science - {}", name),
                None => code.clone(),
            })
            .collect::<Vec<_>>();
        fields.push(format!("keywords = {{{}}}", keywords.join(", ")));
        if let Some(c) = &self.comments {
            fields.push(format!("note = {{Comment: {}}}", escape_latex(c)));
        }
        if let Some(j) = &self.journal_reference {
            fields.push(format!("addendum = {{{}}}", escape_latex(j)));
        }

        let mut out = String::new();
        out.push_str(&format!("@online{{arXiv:{},\n", id));
        for f in fields {
            out.push_str("    ");
            out.push_str(&f);
            out.push_str(",\n");
        }
        out.push_str("}\n");
        out
    }
}

/// Escape every character the BibLaTeX reader treats specially in a braced value,
/// so arbitrary text reads back verbatim.
fn escape_latex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '{' | '}' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
