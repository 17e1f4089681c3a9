//! Page fetch collaborator contract
//!
//! The discovery core never speaks HTTP itself. It consumes a page-fetch
//! capability that yields the raw signals of a page (meta tags, Open Graph
//! and Twitter trees, a source oEmbed document when one was discovered).
//! Networking, redirects and charset/HTML parsing live behind this trait.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

use crate::error::Error;

/// Raw page signals produced by a fetch collaborator.
///
/// `meta` is the namespaced tag tree as found on the page: plain tags at the
/// top level, Open Graph under `og`, Twitter Card under `twitter`. Nested
/// shapes (`og.video.secure_url`) are preserved as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageData {
    /// Raw meta tag tree
    #[serde(default)]
    pub meta: Value,
    /// oEmbed document discovered on the page, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Value>,
}

/// Errors a fetch collaborator can produce.
///
/// The not-found class (`NotFound`, `Dns`) is kept distinct from generic
/// failures because it usually means the target URI does not exist.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The page responded with a 404-class status
    #[error("page not found")]
    NotFound,

    /// DNS resolution failed for the target host
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// Any other fetch failure (connection, timeout, protocol)
    #[error("fetch failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Translate into the pipeline error taxonomy for the given URI.
    pub fn into_error(self, uri: &Url) -> Error {
        match self {
            FetchError::NotFound | FetchError::Dns(_) => Error::PageNotFound(uri.to_string()),
            FetchError::Other(msg) => Error::Fetch(msg),
        }
    }
}

/// Capability to fetch raw page signals for a URI.
///
/// Timeout and retry policy belong to the implementation, not to the
/// discovery core, which awaits the fetch exactly once per request.
#[allow(async_fn_in_trait)]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw signals of `uri`.
    async fn fetch_page(&self, uri: &Url) -> Result<PageData, FetchError>;
}

/// Fetcher backed by preloaded page data.
///
/// Serves exact-URI entries first, then the fallback entry when one is set.
/// Used by the CLI (page data loaded from a JSON file) and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, PageData>,
    fallback: Option<PageData>,
}

impl StaticFetcher {
    /// Create an empty fetcher; every lookup yields `FetchError::NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register page data for an exact URI.
    pub fn insert(&mut self, uri: impl Into<String>, data: PageData) {
        self.pages.insert(uri.into(), data);
    }

    /// Set page data returned for any URI without an exact entry.
    pub fn with_fallback(mut self, data: PageData) -> Self {
        self.fallback = Some(data);
        self
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch_page(&self, uri: &Url) -> Result<PageData, FetchError> {
        if let Some(data) = self.pages.get(uri.as_str()) {
            return Ok(data.clone());
        }
        self.fallback.clone().ok_or(FetchError::NotFound)
    }
}
