//! Feed fetching: one GET per feed, parsed as GeoJSON.
//!
//! Feeds are fetched exactly once per load. There is no retry and no timeout;
//! a failure is returned to the caller, which decides how to surface it.

use crate::{core::constants::USER_AGENT, data::geojson::GeoJson, Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::path::PathBuf;

/// Shared async HTTP client. Building it once avoids TLS and connection
/// pool setup on every fetch.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
});

/// Anything that can hand back a parsed feature collection for a URL
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<GeoJson>;
}

/// Fetches feeds over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        log::debug!("fetching feed {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let geojson = GeoJson::parse(&body)?;
        log::info!(
            "fetched {} features from {} ({} bytes)",
            geojson.features().len(),
            url,
            body.len()
        );
        Ok(geojson)
    }
}

/// Serves feeds from local files. The last path segment of the URL names a
/// file inside `root`, so the standard feed URLs map onto saved snapshots
/// (`all_week.geojson`, `PB2002_boundaries.json`).
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    root: PathBuf,
}

impl FileFeedSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File for `url`, ignoring any query or fragment. Empty, `.` and `..`
    /// segments are rejected so lookups stay inside `root`.
    pub fn path_for(&self, url: &str) -> Result<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let name = path
            .rsplit('/')
            .next()
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .ok_or_else(|| Error::Config(format!("cannot map feed URL to a file: {}", url)))?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        let path = self.path_for(url)?;
        log::debug!("reading feed {} from {}", url, path.display());

        #[cfg(feature = "tokio-runtime")]
        let body = tokio::fs::read_to_string(&path).await?;
        #[cfg(not(feature = "tokio-runtime"))]
        let body = std::fs::read_to_string(&path)?;

        GeoJson::parse(&body)
    }
}
