use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    article::{Article, RawArticle, check_identifier},
    config::CrawlConfig,
    error::{Error, Result},
    extract::{detail::extract_detail, listing::extract_identifiers},
    fetch::PageFetcher,
    subject,
};

/// What happened while crawling a listing, reported as it happens.
#[derive(Debug)]
pub enum Progress<'a> {
    /// The listing page yielded this many identifiers (after any limit).
    Listed(usize),
    Record(&'a Article),
    Skipped { identifier: &'a str, error: &'a Error },
}

/// Tally of a crawl run.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub succeeded: usize,
    pub failures: Vec<(String, Error)>,
}

impl CrawlReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed()
    }
}

pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Crawler { fetcher, config }
    }

    /// Identifiers on the past-week listing of `subject`.
    ///
    /// Unknown subjects fail with [`Error::SubjectNotFound`] before anything is fetched.
    pub fn list_identifiers(&self, subject: &str) -> Result<Vec<String>> {
        subject::require(subject)?;
        let url = self.config.listing_url(subject)?;
        tracing::info!(subject, %url, "fetching listing");
        let html = self.fetcher.fetch(&url)?;
        extract_identifiers(&html, url.as_str())
    }

    /// Fetch and validate one abstract page.
    ///
    /// Identifiers that can never form a valid record (e.g. old-style `cs/0101001`)
    /// fail with an `idx` format error without a request.
    pub fn fetch_article(&self, identifier: &str) -> Result<Article> {
        check_identifier(identifier)?;
        let url = self.config.abstract_url(identifier)?;
        let html = self.fetcher.fetch(&url)?;
        article_from_page(&html, Some(identifier), url.as_str())
    }

    /// Crawl a subject listing, one record at a time in listing order.
    ///
    /// Records that cannot be fetched or fail validation are skipped and tallied;
    /// errors returned by `sink` abort the run.
    pub fn crawl<S>(&self, subject: &str, limit: Option<usize>, mut sink: S) -> Result<CrawlReport>
    where
        S: FnMut(Progress<'_>) -> Result<()>,
    {
        let mut ids = self.list_identifiers(subject)?;
        if let Some(n) = limit {
            ids.truncate(n);
        }
        sink(Progress::Listed(ids.len()))?;

        let mut report = CrawlReport::default();
        for id in ids {
            match self.fetch_article(&id) {
                Ok(article) => {
                    sink(Progress::Record(&article))?;
                    report.succeeded += 1;
                }
                Err(error) => {
                    tracing::warn!(identifier = %id, %error, "skipping record");
                    sink(Progress::Skipped {
                        identifier: &id,
                        error: &error,
                    })?;
                    report.failures.push((id, error));
                }
            }
        }
        tracing::info!(
            subject,
            succeeded = report.succeeded,
            failed = report.failed(),
            "crawl finished"
        );
        Ok(report)
    }
}

/// Build a record from abstract-page markup.
///
/// `identifier` is the id the page was requested under; without one, the id the page
/// advertises is used.
pub fn article_from_page(html: &str, identifier: Option<&str>, source: &str) -> Result<Article> {
    let fields = extract_detail(html, source)?;
    let identifier = identifier
        .map(str::to_string)
        .or(fields.identifier)
        .unwrap_or_default();

    Article::new(RawArticle {
        identifier,
        title: fields.title,
        authors: fields.authors,
        abstract_: fields.abstract_,
        submission_date: fields.submission_date,
        subjects: fields
            .subjects
            .as_deref()
            .map(subject::parse_subject_list)
            .unwrap_or_default(),
        comments: fields.comments,
        journal_reference: fields.journal_reference,
    })
}

/// Reduce user input such as `arXiv:2007.10866v2` or an abs/pdf URL to a bare identifier.
pub fn normalize_identifier(input: &str) -> &str {
    static ABS_URL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^https?://(?:export\.)?arxiv\.org/(?:abs|pdf)/(?P<id>[^?#]+?)(?:\.pdf)?/?(?:[?#].*)?$")
            .unwrap()
    });
    static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<core>.+?)v\d+$").unwrap());

    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix("arXiv:").or_else(|| s.strip_prefix("arxiv:")) {
        s = rest.trim_start();
    }
    if let Some(id) = ABS_URL_RE.captures(s).and_then(|c| c.name("id")) {
        s = id.as_str();
    }
    if let Some(core) = VERSION_RE.captures(s).and_then(|c| c.name("core")) {
        s = core.as_str();
    }
    s
}
