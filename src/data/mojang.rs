//! Mojang version manifest client
//!
//! Downloads the raw `version_manifest_v2.json` body. Parsing is left to the
//! caller so the body can be persisted verbatim.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use thiserror::Error;

/// Upstream location of the version manifest
pub const MOJANG_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// User agent sent with every manifest request
const MCAGE_USER_AGENT: &str = concat!("mcage/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when downloading the manifest
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
}

/// Something that can produce the raw manifest body
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Client for fetching the manifest from Mojang's servers
#[derive(Debug, Clone)]
pub struct MojangClient {
    client: Client,
    url: String,
}

impl Default for MojangClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MojangClient {
    /// Create a new MojangClient pointing at the public manifest
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: MOJANG_MANIFEST_URL.to_string(),
        }
    }

    /// Create a new MojangClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            url: MOJANG_MANIFEST_URL.to_string(),
        }
    }

    /// Point the client at a different manifest URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ManifestSource for MojangClient {
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(USER_AGENT, MCAGE_USER_AGENT)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
