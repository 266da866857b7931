//! HTTP transport for the repository manager REST API

use super::wire::{self, AssetResponse, ListAssetsResponse};
use super::AssetTransport;
use crate::error::NexusError;
use crate::types::{AssetDetail, AssetPage, UploadRequest};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;
use tracing::debug;

const ASSETS_PATH: [&str; 4] = ["service", "rest", "v1", "assets"];
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Basic-auth client for one repository manager endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    base: Url,
    username: String,
    password: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, NexusError> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let base = Url::parse(&endpoint)
            .map_err(|e| NexusError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(NexusError::Config(format!(
                "Invalid endpoint {}: not a base URL",
                endpoint
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NexusError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint,
            base,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint URL extended by `segments`, each percent-encoded on its own.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base endpoints are rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn assets_url(&self) -> Url {
        self.url(ASSETS_PATH)
    }

    fn asset_url(&self, asset_id: &str) -> Url {
        self.url(ASSETS_PATH.into_iter().chain([asset_id]))
    }

    fn upload_url(&self, repository: &str, path: &str) -> Url {
        let inner = path.split('/').filter(|segment| !segment.is_empty());
        self.url(["repository", repository].into_iter().chain(inner))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, NexusError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(wire::remote_error(status.as_u16(), &reason, &body).into())
    }
}

#[async_trait]
impl AssetTransport for HttpTransport {
    async fn paged_query(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<AssetPage, NexusError> {
        let mut query = vec![("repository", repository)];
        if let Some(token) = continuation_token {
            query.push(("continuationToken", token));
        }
        debug!(repository, token = ?continuation_token, "Listing assets");
        let response = self
            .send(self.client.get(self.assets_url()).query(&query))
            .await?;
        let body: ListAssetsResponse = response.json().await?;
        Ok(body.into_page(repository))
    }

    async fn asset_detail(&self, asset_id: &str) -> Result<AssetDetail, NexusError> {
        let response = self.send(self.client.get(self.asset_url(asset_id))).await?;
        let body: AssetResponse = response.json().await?;
        Ok(body.into())
    }

    async fn content_length(&self, download_url: &str) -> Result<Option<u64>, NexusError> {
        let response = self.send(self.client.head(download_url)).await?;
        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        if length.is_none() {
            debug!(url = download_url, "No Content-Length; size unknown");
        }
        Ok(length)
    }

    async fn upload(
        &self,
        repository: &str,
        path: &str,
        request: UploadRequest,
    ) -> Result<(), NexusError> {
        let content_type = request
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let mut builder = self
            .client
            .put(self.upload_url(repository, path))
            .header(CONTENT_TYPE, content_type);
        if let Some(size) = request.size {
            builder = builder.header(CONTENT_LENGTH, size);
        }
        debug!(repository, path, "Uploading asset");
        self.send(builder.body(request.content)).await?;
        Ok(())
    }
}
