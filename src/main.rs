//! moviecat - Browse TMDB movies from the command line
//!
//! Resolves configuration, builds the cached TMDB fetcher and prints the
//! catalog or meta response for the requested subcommand as JSON on stdout.
//! Logs go to stderr.

use clap::Parser;

use moviecat::addon;
use moviecat::cache::ExpiringCache;
use moviecat::cli::{Cli, Command};
use moviecat::config::Config;
use moviecat::data::TmdbClient;
use moviecat::fetch::CachedFetcher;

/// Sets up tracing output on stderr
///
/// Respects RUST_LOG if set, otherwise logs at info, or debug with --verbose.
fn init_tracing(verbose: bool) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "moviecat=debug".to_string()
        } else {
            "moviecat=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let client = TmdbClient::from_config(&config)?;
    let fetcher = CachedFetcher::new(client, ExpiringCache::new(config.cache_ttl));

    let output = match &cli.command {
        Command::Catalog(args) => {
            let response =
                addon::catalog(&fetcher, &args.kind, &args.catalog, &args.to_filters()).await;
            tracing::info!(count = response.metas.len(), "catalog served");
            serde_json::to_string_pretty(&response)?
        }
        Command::Meta(args) => {
            let response = addon::meta(&fetcher, &args.kind, &args.id).await;
            tracing::info!(found = response.meta.is_some(), id = %args.id, "meta served");
            serde_json::to_string_pretty(&response)?
        }
    };

    println!("{}", output);
    Ok(())
}
