//! EmbedKit CLI
//!
//! Runs the discovery pipeline over page data loaded from a JSON file and
//! prints the result, or exports the routing table / meta vocabulary for
//! external routing layers.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use embedkit::fetch::{PageData, StaticFetcher};
use embedkit::meta::{meta_mappings, MetaMapping};
use embedkit::oembed::routing_table_json;
use embedkit::whitelist::StaticWhitelist;
use embedkit::{DiscoveryEngine, DiscoveryOptions, Oembed, PluginRegistry};

/// Output shape for a discovery run
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Full multi-link discovery payload as JSON
    Json,
    /// Legacy single-object oEmbed as JSON
    Oembed,
    /// Legacy single-object oEmbed as XML
    OembedXml,
}

/// EmbedKit link discovery
#[derive(Parser, Debug)]
#[command(name = "embedkit")]
#[command(version)]
#[command(about = "Discover embeddable content links for a web URI")]
struct Args {
    /// Target URI to discover links for
    uri: Option<String>,

    /// JSON file with raw page signals ({"meta": ..., "oembed": ...})
    #[arg(long)]
    page_data: Option<PathBuf>,

    /// Group links by relation category
    #[arg(long)]
    group: bool,

    /// Attach the whitelist record for the target host
    #[arg(long)]
    whitelist: bool,

    /// Echo the raw meta/oEmbed signals in the result
    #[arg(long)]
    meta: bool,

    /// Keep the plugin trace and timing in the result
    #[arg(long)]
    debug: bool,

    /// Mix generic plugins with domain plugins in registration order
    #[arg(long)]
    mix_all_with_domain_plugin: bool,

    /// Output shape
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Print the plugin routing table export and exit
    #[arg(long)]
    routing_table: bool,

    /// Print the canonical attribute vocabulary and exit
    #[arg(long)]
    meta_mappings: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = PluginRegistry::with_defaults();

    if args.routing_table {
        println!("{}", routing_table_json(&registry.export_routing_table())?);
        return Ok(());
    }

    if args.meta_mappings {
        println!("{}", serde_json::to_string_pretty(&meta_mappings())?);
        return Ok(());
    }

    let Some(uri) = args.uri else {
        bail!("a target URI is required (or use --routing-table / --meta-mappings)");
    };

    let mut fetcher = StaticFetcher::new();
    if let Some(path) = &args.page_data {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let page: PageData =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        fetcher = fetcher.with_fallback(page);
    }

    let engine = DiscoveryEngine::new(registry, fetcher, StaticWhitelist::new());

    let options = DiscoveryOptions {
        group: args.group,
        whitelist: args.whitelist,
        meta: args.meta,
        debug: args.debug,
        mix_all_with_domain_plugin: args.mix_all_with_domain_plugin,
    };

    let result = engine.discover(&uri, options).await?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Oembed | Format::OembedXml => {
            let url = embedkit::pipeline::prepare_uri(&uri)?;
            // Re-normalize for the title/provider fields of the record.
            let meta = args
                .page_data
                .as_ref()
                .and_then(|path| std::fs::read_to_string(path).ok())
                .and_then(|raw| serde_json::from_str::<PageData>(&raw).ok())
                .map(|page| MetaMapping::normalize(&page.meta, page.oembed.as_ref()));

            let oembed = Oembed::from_result(&url, &result, meta.as_ref());
            match args.format {
                Format::Oembed => println!("{}", serde_json::to_string_pretty(&oembed)?),
                _ => println!("{}", oembed.to_xml()?),
            }
        }
    }

    Ok(())
}
