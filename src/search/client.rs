//! HTTP client for the agenda service.

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use thiserror::Error;

use crate::config::{AppConfig, Profile};
use crate::model::types::SearchResult;
use crate::search::query::{Endpoint, SearchCriteria};

/// The only failure text a user ever sees.
pub const FAILURE_MESSAGE: &str = "Failed to fetch results. Please try again.";

#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport failure, non-2xx status, or an undecodable body.
    #[error("Failed to fetch results. Please try again.")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl SearchError {
    /// Message suitable for the UI; never exposes transport details.
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}

/// Issues one GET per submission against the configured service.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: &AppConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("agenda-search/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers(config.profile));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(SearchError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Select the endpoint for `criteria` and fetch it.
    pub async fn dispatch(&self, criteria: &SearchCriteria) -> Result<SearchResult, SearchError> {
        let endpoint = Endpoint::select(criteria);
        self.fetch(&endpoint).await
    }

    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<SearchResult, SearchError> {
        let url = endpoint.url(&self.base_url);
        let started = Instant::now();
        tracing::info!(endpoint = %endpoint.kind(), %url, "search_start");

        let outcome = self.get_json(&url).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok((status, result)) => {
                tracing::info!(
                    endpoint = %endpoint.kind(),
                    status,
                    elapsed_ms,
                    count = result.len(),
                    "search_done"
                );
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(
                    endpoint = %endpoint.kind(),
                    %url,
                    elapsed_ms,
                    status = err.status().map(|s| s.as_u16()),
                    error = %err,
                    "search_failed"
                );
                Err(SearchError::RequestFailed(err))
            }
        }
    }

    async fn get_json(&self, url: &str) -> Result<(u16, SearchResult), reqwest::Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let status = response.status().as_u16();
        let result = response.json::<SearchResult>().await?;
        Ok((status, result))
    }
}

fn default_headers(profile: Profile) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if profile.is_production() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    headers
}
