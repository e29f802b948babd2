use clap::Parser;
use tracing::{debug, info, warn};

use disc_autorip::{
    cli::{handle_commands, CliArgs},
    config::Config,
    disc::MakeMkv,
    metadata::{MetadataProvider, NoMetadata, TmdbProvider},
    processing::{RipOptions, RipWorkflow, TerminalPrompt},
    utils::{setup_logging, Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    args.validate()?;

    let config = Config::load_with_fallback(&args.config)?;

    setup_logging(
        args.get_log_level(&config.logging.level),
        config.logging.show_timestamps,
        config.logging.colored_output && args.should_use_color(),
    )?;

    let makemkv = MakeMkv::new(
        &config.tools,
        config.ripping.min_title_seconds,
        config.ripping.show_progress,
    );

    if !args.validate_config {
        makemkv
            .check_availability()
            .await
            .map_err(|e| Error::tool(format!("makemkvcon not available: {}", e)))?;
    }

    if handle_commands(&args, &config, &makemkv).await? {
        return Ok(());
    }

    handle_rip(&args, &config, &makemkv).await
}

async fn handle_rip(args: &CliArgs, config: &Config, makemkv: &MakeMkv) -> Result<()> {
    let options = RipOptions::from_args(args, config)?;
    let metadata = metadata_provider(config)?;

    let workflow = RipWorkflow::new(makemkv, makemkv, &*metadata, &TerminalPrompt, config);
    let summary = workflow.run(&options).await?;

    info!(
        "Saved {} {} file(s) to {}",
        summary.saved.len(),
        summary.kind,
        options.output_dir.display()
    );
    for path in &summary.saved {
        debug!("  {}", path.display());
    }

    if !summary.failed.is_empty() {
        warn!("Failed titles:");
        for (title_id, error) in &summary.failed {
            warn!("  - title {}: {}", title_id, error);
        }
    }

    Ok(())
}

fn metadata_provider(config: &Config) -> Result<Box<dyn MetadataProvider>> {
    if !config.metadata.enabled {
        debug!("Metadata lookups disabled");
        return Ok(Box::new(NoMetadata));
    }

    match config.metadata.resolved_api_key() {
        Some(api_key) => Ok(Box::new(TmdbProvider::new(api_key, &config.metadata)?)),
        None => {
            info!("No TMDB API key configured, files are named from the disc label");
            Ok(Box::new(NoMetadata))
        }
    }
}
