use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

/// Public arXiv host.
pub const ARXIV_BASE_URL: &str = "https://arxiv.org";

/// Listing pages are requested once with this page size; there is no further pagination.
pub const LISTING_PAGE_SIZE: usize = 1000;

pub const CONNECT_TIMEOUT_SECS: u64 = 5;
pub const GLOBAL_TIMEOUT_SECS: u64 = 15;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; arxiv-crawler/0.1; +https://arxiv.org)";

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'/')
    .add(b'{')
    .add(b'}');

/// Settings for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub global_timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            // Constant, known-good URL.
            base_url: Url::parse(ARXIV_BASE_URL).unwrap(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            global_timeout: Duration::from_secs(GLOBAL_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    /// `{base}/list/{subject}/pastweek?skip=0&show=1000`
    pub fn listing_url(&self, subject: &str) -> Result<Url, url::ParseError> {
        let subject = utf8_percent_encode(subject, PATH_SEGMENT_ENCODE_SET).to_string();
        let mut url = self.base().join(&format!("list/{}/pastweek", subject))?;
        url.query_pairs_mut()
            .append_pair("skip", "0")
            .append_pair("show", &LISTING_PAGE_SIZE.to_string());
        Ok(url)
    }

    /// `{base}/abs/{identifier}`
    pub fn abstract_url(&self, identifier: &str) -> Result<Url, url::ParseError> {
        let id = utf8_percent_encode(identifier, PATH_SEGMENT_ENCODE_SET).to_string();
        self.base().join(&format!("abs/{}", id))
    }

    /// `base_url` with a trailing `/`, so joins append below its last segment.
    fn base(&self) -> Url {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base
    }
}
