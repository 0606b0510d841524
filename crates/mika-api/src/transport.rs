use std::future::Future;
use std::time::Duration;

use mika_core::config::ApiConfig;
use reqwest::Client;

use crate::error::ApiError;

const USER_AGENT: &str = concat!("mika/", env!("CARGO_PKG_VERSION"));

/// Performs GET requests against the upstream API and returns parsed JSON.
///
/// [`HttpTransport`] is the real implementation; tests substitute an
/// in-memory one.
pub trait Transport: Send + Sync {
    /// GET `path_and_query` (starting with `/`) relative to the API root.
    fn get_json(
        &self,
        path_and_query: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send;
}

/// reqwest-backed transport with a bounded request timeout.
pub struct HttpTransport {
    base_url: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "upstream API error");
            Err(ApiError::Api {
                status,
                message: body,
            })
        }
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, path_and_query: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.url(path_and_query);
        tracing::debug!(%url, "GET");

        let resp = self.http.get(&url).send().await?;
        let resp = Self::check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
