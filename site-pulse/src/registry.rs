//! Docker Hub tag listing.
//!
//! Single API call, no fallback chain: the v2 repositories endpoint is the
//! only data source for registry-hosted images, and its failures propagate
//! to the caller.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DOCKER_HUB_API: &str = "https://hub.docker.com/v2/repositories";

/// Tags requested per listing; the first entry is treated as "latest".
const TAG_PAGE_SIZE: u32 = 10;

/// Errors that can occur while listing registry tags.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Docker Hub API error.
    #[error("Docker Hub API error: {0}")]
    Http(#[from] reqwest::Error),
}

/// One image tag as returned by the registry, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryTag {
    /// Tag name.
    pub name: String,

    /// Last-updated timestamp, RFC 3339.
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagListing {
    #[serde(default)]
    results: Vec<RegistryTag>,
}

/// Docker Hub registry client.
pub struct DockerHubClient {
    http: reqwest::Client,
}

impl DockerHubClient {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http })
    }

    /// Lists tags for a "namespace/repository" image, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the listing request fails.
    pub async fn list_tags(&self, path: &str) -> Result<Vec<RegistryTag>, RegistryError> {
        let url = format!("{DOCKER_HUB_API}/{path}/tags");
        let listing: TagListing = self
            .http
            .get(&url)
            .query(&[("page_size", TAG_PAGE_SIZE)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(path, count = listing.results.len(), "listed registry tags");
        Ok(listing.results)
    }
}
