//! EmbedKit - Embed Link Discovery & Normalization Pipeline
//!
//! This crate discovers embeddable and representative content for an
//! arbitrary web URI: it runs a catalog of extraction plugins against the
//! normalized metadata of a page and merges their contributions into one
//! consistent, rel-tagged link collection, with a legacy single-object
//! oEmbed rendition on top.
//!
//! # Architecture
//!
//! ```text
//! URI ──▶ fetch (collaborator) ──▶ MetaMapping ──▶ PluginRegistry
//!                                       │               │
//!                                       ▼               ▼
//!                                ExtractionRunner ◀─ resolved plugins
//!                                       │
//!                                       ▼
//!                                LinkAggregator ──▶ AggregatedResult
//!                                                        │
//!                                                        ▼
//!                                                  Oembed / XML
//! ```
//!
//! A single failing plugin or an empty page degrades the result; it never
//! aborts the request. Only a malformed URI or an unreachable page cross
//! the pipeline boundary as errors.
//!
//! # Quick Start
//!
//! ```rust
//! use embedkit::{DiscoveryEngine, DiscoveryOptions, PluginRegistry};
//! use embedkit::fetch::{PageData, StaticFetcher};
//! use embedkit::whitelist::StaticWhitelist;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let page: PageData = serde_json::from_str(
//!     r#"{"meta": {"og": {"video": {"url": "http://v/1", "type": "video/mp4"}}}}"#,
//! )?;
//! let fetcher = StaticFetcher::new().with_fallback(page);
//!
//! let engine = DiscoveryEngine::new(
//!     PluginRegistry::with_defaults(),
//!     fetcher,
//!     StaticWhitelist::new(),
//! );
//!
//! let result = tokio_test::block_on(
//!     engine.discover("http://example.com/clip", DiscoveryOptions::default()),
//! )?;
//! assert!(!result.links.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod fetch;
pub mod meta;
pub mod oembed;
pub mod pipeline;
pub mod plugins;
pub mod whitelist;

// Re-exports for convenience
pub use error::{Error, Result};
pub use meta::MetaMapping;
pub use oembed::{Oembed, OembedType};
pub use pipeline::{AggregatedResult, DiscoveryEngine, DiscoveryOptions, Links};
pub use plugins::{Link, LinkCandidate, Plugin, PluginRegistry, RegistryBuilder, Rel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
