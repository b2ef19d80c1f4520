use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use shared::{
    domain::{PreparedRoute, RouteId},
    error::ApiErrorBody,
    protocol::{download_route_segments, PreparedRoutesResponse, PREPARED_ROUTES_SEGMENTS},
};
use tracing::debug;
use url::Url;

use crate::error::{DownloadError, FetchError, DOWNLOAD_FALLBACK_MESSAGE};

/// The two network calls of the workflow.
#[async_trait]
pub trait RoutesApi: Send + Sync {
    async fn list_prepared_routes(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<Vec<PreparedRoute>, FetchError>;

    /// Marks `route_id` as downloaded by the current driver.
    async fn mark_downloaded(
        &self,
        route_id: &RouteId,
        token: Option<&str>,
    ) -> std::result::Result<(), DownloadError>;
}

pub struct HttpRoutesApi {
    http: Client,
    base_url: Url,
}

impl HttpRoutesApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(base_url, http)
    }

    fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid api base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url '{base_url}' cannot carry a path"));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RoutesApi for HttpRoutesApi {
    async fn list_prepared_routes(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<Vec<PreparedRoute>, FetchError> {
        let url = self.endpoint(&PREPARED_ROUTES_SEGMENTS);
        debug!(%url, "requesting prepared routes");

        let res = Self::authorized(self.http.get(url), token)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let parsed: PreparedRoutesResponse =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(parsed.into_routes())
    }

    async fn mark_downloaded(
        &self,
        route_id: &RouteId,
        token: Option<&str>,
    ) -> std::result::Result<(), DownloadError> {
        let url = self.endpoint(&download_route_segments(route_id.as_str()));
        debug!(%url, %route_id, "requesting route download");

        let res = Self::authorized(self.http.post(url), token)
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.to_string()))?;

        if res.status().is_success() {
            return Ok(());
        }

        // Any non-2xx answer is a rejection; the reason falls back to a
        // generic message when the body is absent or not the `{error}` shape.
        let status = res.status();
        let body = res.bytes().await.unwrap_or_default();
        let reason = serde_json::from_slice::<ApiErrorBody>(&body)
            .unwrap_or_default()
            .message_or(DOWNLOAD_FALLBACK_MESSAGE);
        debug!(%route_id, status = status.as_u16(), %reason, "route download rejected");
        Err(DownloadError::Rejected { reason })
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
