//! Time-boxed page fetching

use async_trait::async_trait;
use reqwest::{Client, redirect};
use tracing::debug;

use crate::config::AuditConfig;
use crate::error::{AuditError, FetchFailure};
use crate::types::is_fetched_status;

const MAX_REDIRECTS: usize = 10;

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status_code: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        is_fetched_status(self.status_code)
    }
}

/// Issues one GET per call. Implementations must not retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchFailure>;
}

/// [`PageFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.page_timeout())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| AuditError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchFailure> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;
        let status_code = response.status().as_u16();

        // The client timeout also covers the body read
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body(e.to_string())
            }
        })?;

        debug!(url, status_code, bytes = body.len(), "fetched page");
        Ok(FetchedPage { status_code, body })
    }
}

fn classify_error(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_builder() {
        FetchFailure::InvalidUrl(error.to_string())
    } else {
        FetchFailure::network(error.to_string())
    }
}
