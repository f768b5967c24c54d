use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header;
use std::time::Duration;
use thiserror::Error;

/// Why a single url could not be retrieved. The crawler logs it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("not html: {0}")]
    NotHtml(String),

    #[error("body of {0} bytes exceeds limit")]
    TooLarge(usize),
}

/// Retrieves the raw html bytes behind a url. Shared by every crawler worker.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP fetcher. Its connection pool is shared by all workers.
pub struct HttpFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, max_bytes })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.client.get(url).send().map_err(|e| FetchError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            if !ct.starts_with("text/html") {
                return Err(FetchError::NotHtml(ct.to_string()));
            }
        }
        let bytes = resp.bytes().map_err(|e| FetchError::Request(e.to_string()))?;
        if bytes.len() > self.max_bytes {
            return Err(FetchError::TooLarge(bytes.len()));
        }
        Ok(bytes.to_vec())
    }
}
