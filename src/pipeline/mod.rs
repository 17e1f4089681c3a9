//! Discovery pipeline
//!
//! This module wires the pipeline together: URI preparation, the awaited
//! page fetch, meta normalization, plugin resolution and extraction, and
//! link aggregation. The [`DiscoveryEngine`] owns the immutable plugin
//! registry and the external collaborators for its whole lifetime; request
//! state never outlives a call.

pub mod aggregate;
pub mod runner;

pub use aggregate::{GroupedLinks, LinkAggregator, Links, REL_GROUPS};
pub use runner::{ExtractionRunner, PluginTrace};

use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, instrument};
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::{PageData, PageFetcher};
use crate::meta::MetaMapping;
use crate::plugins::{PluginContext, PluginRegistry};
use crate::whitelist::{WhitelistRecord, WhitelistStore};

/// Per-request pipeline flags.
///
/// Native booleans by design; transport-string coercion belongs to the
/// caller's HTTP layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryOptions {
    /// Group the final links by relation category
    pub group: bool,
    /// Attach the whitelist record for the target host
    pub whitelist: bool,
    /// Echo the raw meta/oEmbed signals in the result
    pub meta: bool,
    /// Keep the plugin trace and timing in the result
    pub debug: bool,
    /// Keep generic plugins in registration order instead of demoting them
    /// after the domain-specific matches
    pub mix_all_with_domain_plugin: bool,
}

/// Raw signal echo attached when the `meta` option is set.
#[derive(Debug, Clone, Serialize)]
pub struct RawMetaEcho {
    /// Raw meta tag tree as fetched
    pub meta: Value,
    /// Raw oEmbed document as fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Value>,
}

/// Final output of a discovery request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedResult {
    /// Discovered links, flat or grouped
    pub links: Links,
    /// Whitelist record (empty record when the host has none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<WhitelistRecord>,
    /// Raw signal echo
    #[serde(rename = "raw-meta", skip_serializing_if = "Option::is_none")]
    pub raw_meta: Option<RawMetaEcho>,
    /// Per-plugin debug trace, stripped unless requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginTrace>>,
    /// Total pipeline time in milliseconds, stripped unless requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u128>,
}

/// Normalize a caller-supplied URI string.
///
/// Protocol-relative URIs gain `http:`, bare host/path forms gain
/// `http://`. An empty or unparseable URI is [`Error::MalformedInput`],
/// rejected before any fetch or plugin work.
pub fn prepare_uri(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::MalformedInput("empty URI".to_string()));
    }

    let prepared = if raw.starts_with("//") {
        format!("http:{raw}")
    } else {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        }
    };

    let url = Url::parse(&prepared).map_err(|e| Error::MalformedInput(format!("{raw}: {e}")))?;
    if url.host_str().is_none() {
        return Err(Error::MalformedInput(format!("{raw}: no host")));
    }
    Ok(url)
}

/// The link discovery pipeline.
///
/// Built once at process start from an immutable registry and the external
/// collaborators, then shared read-only across requests.
pub struct DiscoveryEngine<F, W> {
    registry: PluginRegistry,
    fetcher: F,
    whitelist: W,
}

impl<F: PageFetcher, W: WhitelistStore> DiscoveryEngine<F, W> {
    /// Assemble an engine from a registry and collaborators.
    pub fn new(registry: PluginRegistry, fetcher: F, whitelist: W) -> Self {
        Self {
            registry,
            fetcher,
            whitelist,
        }
    }

    /// The plugin registry, for routing-table export.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Run the full pipeline for a caller-supplied URI.
    ///
    /// Fails only with [`Error::MalformedInput`] or the fetch collaborator's
    /// errors (not-found kept distinguishable). An empty link collection is
    /// a success.
    #[instrument(skip(self, options))]
    pub async fn discover(&self, uri: &str, options: DiscoveryOptions) -> Result<AggregatedResult> {
        let url = prepare_uri(uri)?;
        info!(uri = %url, "discovering links");

        let page = self
            .fetcher
            .fetch_page(&url)
            .await
            .map_err(|e| e.into_error(&url))?;

        Ok(self.discover_from_page(&url, &page, options))
    }

    /// Run the pipeline over already-fetched page signals.
    ///
    /// Pure transformation: cannot fail. Plugin errors degrade to partial
    /// or empty results, visible only in the debug trace.
    pub fn discover_from_page(
        &self,
        uri: &Url,
        page: &PageData,
        options: DiscoveryOptions,
    ) -> AggregatedResult {
        let started = Instant::now();

        let meta = MetaMapping::normalize(&page.meta, page.oembed.as_ref());
        let plugins = self
            .registry
            .resolve(uri, options.mix_all_with_domain_plugin);
        let ctx = PluginContext { uri, meta: &meta };
        let (candidates, trace) = ExtractionRunner::run(&plugins, &ctx);
        let links = LinkAggregator::aggregate(candidates, options.group);

        let whitelist = if options.whitelist {
            let host = uri.host_str().unwrap_or("");
            Some(self.whitelist.lookup(host).unwrap_or_default())
        } else {
            None
        };

        let raw_meta = if options.meta {
            Some(RawMetaEcho {
                meta: page.meta.clone(),
                oembed: page.oembed.clone(),
            })
        } else {
            None
        };

        let (plugins, time) = if options.debug {
            (Some(trace), Some(started.elapsed().as_millis()))
        } else {
            (None, None)
        };

        AggregatedResult {
            links,
            whitelist,
            raw_meta,
            plugins,
            time,
        }
    }
}
