//! JSON payloads of the repository manager REST API

use crate::error::RemoteError;
use crate::types::{AssetDescriptor, AssetDetail, AssetPage, Checksum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GET /service/rest/v1/assets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsResponse {
    #[serde(default)]
    pub items: Vec<ListAssetsItem>,
    #[serde(default)]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsItem {
    pub id: String,
    #[serde(default)]
    pub download_url: String,
    pub path: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub checksum: Checksum,
}

/// GET /service/rest/v1/assets/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blob_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub checksum: Checksum,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub repository: String,
}

/// Body of a non-2xx response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ListAssetsResponse {
    /// An empty continuation token means the same as none.
    pub fn into_page(self, repository: &str) -> AssetPage {
        AssetPage {
            items: self
                .items
                .into_iter()
                .map(|item| item.into_descriptor(repository))
                .collect(),
            continuation_token: self.continuation_token.filter(|token| !token.is_empty()),
        }
    }
}

impl ListAssetsItem {
    fn into_descriptor(self, repository: &str) -> AssetDescriptor {
        let repository = if self.repository.is_empty() {
            repository.to_string()
        } else {
            self.repository
        };
        AssetDescriptor {
            id: self.id,
            repository,
            path: self.path,
            checksum: self.checksum,
            size: None,
            last_modified: None,
            download_url: self.download_url,
        }
    }
}

impl From<AssetResponse> for AssetDetail {
    fn from(asset: AssetResponse) -> Self {
        AssetDetail {
            last_modified: asset.last_modified.or(asset.blob_created),
            checksum: asset.checksum,
            download_url: asset.download_url,
        }
    }
}

/// Fill the gaps of a decoded (or undecodable) error body from the HTTP status line.
pub fn remote_error(status: u16, reason: &str, body: &str) -> RemoteError {
    let decoded: ErrorResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Couldn't decode error response: {}", e);
            ErrorResponse::default()
        }
    };
    RemoteError {
        status: if decoded.status == 0 { status } else { decoded.status },
        code: if decoded.code.is_empty() {
            "unknown".to_string()
        } else {
            decoded.code
        },
        message: if decoded.message.is_empty() {
            format!("Unknown {} {}", status, reason).trim_end().to_string()
        } else {
            decoded.message
        },
    }
}
