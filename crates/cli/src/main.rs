//! Command-line entry point for sampling and watching selector catalogs.
mod config;
mod logging;
mod sample;
mod watch;

use std::time::Duration;

use anyhow::{Context, Result};
use config::{CliConfig, Mode, OutputFormat};
use probability_content::CatalogLoader;
use probability_runtime::DriverRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env().with_catalog_arg(std::env::args().nth(1));
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let path = config
        .catalog
        .clone()
        .context("No catalog given and no platform config directory found")?;
    let catalog = CatalogLoader::load(&path)?;
    let mut registry = DriverRegistry::from_catalog(&catalog, config.seed);

    tracing::info!(
        catalog = %path.display(),
        selectors = registry.len(),
        mode = %config.mode,
        "catalog ready"
    );

    match config.mode {
        Mode::Sample => {
            let report = sample::sample_registry(&mut registry, config.draws, config.seed);
            match config.output {
                OutputFormat::Table => print!("{report}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Mode::Watch => {
            let duration = Duration::from_secs(config.watch_secs);
            let stop = async move {
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {}
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            tracing::warn!("Failed to listen for ctrl-c: {}", e);
                        }
                        tracing::info!("interrupted");
                    }
                }
            };
            for outcome in watch::watch(registry, stop).await? {
                println!("{} = {}", outcome.selector, outcome.value);
                for (name, value) in outcome.parameters.iter() {
                    println!("  {name}: {value:?}");
                }
            }
        }
    }

    Ok(())
}
