//! Plugin extraction runner
//!
//! Invokes each resolved plugin against the request context, isolating
//! failures: an `Err` return or a panic discards that plugin's contribution
//! and is recorded in its trace entry, and extraction continues with the
//! remaining plugins. Candidates accumulate in registry order.

use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

use crate::plugins::{LinkCandidate, Plugin, PluginContext};

/// Debug trace of a single plugin invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PluginTrace {
    /// Plugin name
    pub plugin: String,
    /// Candidates contributed (zero when errored)
    pub found: usize,
    /// Invocation time in milliseconds
    pub elapsed_ms: u128,
    /// Extraction error, when the contribution was discarded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs the resolved plugin sequence with per-plugin isolation.
pub struct ExtractionRunner;

impl ExtractionRunner {
    /// Invoke `plugins` in order, collecting all candidates and a trace.
    pub fn run(
        plugins: &[&dyn Plugin],
        ctx: &PluginContext<'_>,
    ) -> (Vec<LinkCandidate>, Vec<PluginTrace>) {
        let mut candidates = Vec::new();
        let mut traces = Vec::with_capacity(plugins.len());

        for plugin in plugins {
            let started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| plugin.links(ctx)));
            let elapsed_ms = started.elapsed().as_millis();

            let trace = match outcome {
                Ok(Ok(links)) => {
                    debug!(plugin = plugin.name(), found = links.len(), "plugin ran");
                    let found = links.len();
                    candidates.extend(links);
                    PluginTrace {
                        plugin: plugin.name().to_string(),
                        found,
                        elapsed_ms,
                        error: None,
                    }
                }
                Ok(Err(err)) => {
                    warn!(plugin = plugin.name(), error = %err, "plugin errored");
                    PluginTrace {
                        plugin: plugin.name().to_string(),
                        found: 0,
                        elapsed_ms,
                        error: Some(err.to_string()),
                    }
                }
                Err(_) => {
                    warn!(plugin = plugin.name(), "plugin panicked");
                    PluginTrace {
                        plugin: plugin.name().to_string(),
                        found: 0,
                        elapsed_ms,
                        error: Some("plugin panicked".to_string()),
                    }
                }
            };
            traces.push(trace);
        }

        (candidates, traces)
    }
}
