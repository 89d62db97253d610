use std::{collections::HashMap, fs, path::Path};

use url::Url;

use crate::{
    config::CrawlConfig,
    error::{Error, Result},
};

/// Source of raw page markup.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetches pages over HTTP(S).
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(config.connect_timeout))
            .timeout_global(Some(config.global_timeout))
            .build();
        HttpFetcher {
            agent: ureq::Agent::new_with_config(cfg),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        let unavailable = |reason: String| Error::PageUnavailable {
            url: url.to_string(),
            reason,
        };

        tracing::debug!(%url, "GET");
        // ureq reports 4xx/5xx statuses as errors.
        let res = self
            .agent
            .get(url.as_str())
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| unavailable(e.to_string()))?;

        if let Some(ctv) = res.headers().get("content-type")
            && let Ok(cts) = ctv.to_str()
        {
            let cts = cts.to_ascii_lowercase();
            if !cts.contains("html") {
                return Err(unavailable(format!("non-HTML content-type: {cts}")));
            }
        }

        res.into_body()
            .read_to_string()
            .map_err(|e| unavailable(format!("failed to read body: {e}")))
    }
}

/// Serves pages from memory, keyed by URL. Used for saved pages and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: &Url, html: impl Into<String>) {
        self.pages.insert(url.to_string(), html.into());
    }

    /// Load a saved page from disk and serve it under `url`.
    pub fn insert_file(&mut self, url: &Url, path: &Path) -> Result<()> {
        let html = fs::read_to_string(path)?;
        self.insert(url, html);
        Ok(())
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::PageUnavailable {
                url: url.to_string(),
                reason: "no such page".to_string(),
            })
    }
}
