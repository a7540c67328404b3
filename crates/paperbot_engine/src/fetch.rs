use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput};

/// Repository base URL and the per-step timeouts.
///
/// Search is the interactive first step and stays short; detail pages can
/// be heavier; file payloads may be large.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub search_timeout: Duration,
    pub detail_timeout: Duration,
    pub file_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://202.88.225.92".to_string(),
            search_timeout: Duration::from_secs(5),
            detail_timeout: Duration::from_secs(30),
            file_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Transport seam: every network touch in the pipeline goes through this,
/// so tests can substitute a canned transport.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` with the given total request timeout.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    connect_timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn build_client(&self, timeout: Duration) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchOutput, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client(timeout)?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = header_value(&response, CONTENT_TYPE);
        let content_disposition = header_value(&response, CONTENT_DISPOSITION);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchOutput {
            bytes,
            metadata: FetchMetadata {
                final_url,
                content_type,
                content_disposition,
            },
        })
    }
}

fn header_value(response: &reqwest::Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
