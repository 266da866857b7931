//! Retry decorator for transports
//!
//! Re-issues calls that failed with a retryable error. Fatal remote errors
//! (403) and local errors are returned on the first attempt.

use super::AssetTransport;
use crate::error::NexusError;
use crate::types::{AssetDetail, AssetPage, UploadRequest};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry behaviour for transport calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, NexusError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NexusError>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        "Retrying after error: {}",
                        err
                    );
                    attempt += 1;
                    if !self.delay.is_zero() {
                        sleep(self.delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Transport wrapper applying a [`RetryPolicy`] to every call
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: AssetTransport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: AssetTransport> AssetTransport for RetryingTransport<T> {
    async fn paged_query(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<AssetPage, NexusError> {
        self.policy
            .run("paged_query", || {
                self.inner.paged_query(repository, continuation_token)
            })
            .await
    }

    async fn asset_detail(&self, asset_id: &str) -> Result<AssetDetail, NexusError> {
        self.policy
            .run("asset_detail", || self.inner.asset_detail(asset_id))
            .await
    }

    async fn content_length(&self, download_url: &str) -> Result<Option<u64>, NexusError> {
        self.policy
            .run("content_length", || self.inner.content_length(download_url))
            .await
    }

    async fn upload(
        &self,
        repository: &str,
        path: &str,
        request: UploadRequest,
    ) -> Result<(), NexusError> {
        self.policy
            .run("upload", || {
                self.inner.upload(repository, path, request.clone())
            })
            .await
    }
}
