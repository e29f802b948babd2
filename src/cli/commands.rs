use crate::{
    analysis::{ContentClassification, ContentTypeDetector},
    cli::CliArgs,
    config::Config,
    disc::{format_duration, DiscInfo, DiscReader},
    naming::clean_disc_label,
    utils::{logging::describe_title, Result},
};

pub async fn handle_commands(
    args: &CliArgs,
    config: &Config,
    reader: &dyn DiscReader,
) -> Result<bool> {
    if args.validate_config {
        validate_config(&args.config, config);
        return Ok(true);
    }

    if args.scan {
        scan_disc(args, reader).await?;
        return Ok(true);
    }

    // No info commands executed
    Ok(false)
}

/// `config` has already been loaded and validated by the time this runs;
/// a broken file never gets this far.
fn validate_config(path: &std::path::Path, config: &Config) {
    if path.exists() {
        println!("✓ Configuration file is valid: {}", path.display());
    } else {
        println!("✓ Configuration is valid (using discovered/default config)");
    }
    println!();

    println!("Configuration Summary:");
    println!("{:-<40}", "");
    println!("makemkvcon: {}", config.tools.makemkvcon);
    println!("Temp directory: {}", config.app.temp_dir);
    println!(
        "Detection: threshold {:.2}, fallback {}, prompt {}",
        config.detection.confidence_threshold,
        config.detection.fallback,
        config.detection.prompt_when_uncertain
    );
    println!(
        "Minimum title length: {}s",
        config.ripping.min_title_seconds
    );
    println!(
        "Metadata lookups: {}",
        match (config.metadata.enabled, config.metadata.resolved_api_key()) {
            (false, _) => "disabled",
            (true, None) => "enabled, but no TMDB API key",
            (true, Some(_)) => "enabled",
        }
    );
}

async fn scan_disc(args: &CliArgs, reader: &dyn DiscReader) -> Result<()> {
    let source = args.disc_source()?;
    let mut info = reader.read_disc(&source).await?;
    if let Some(disc_type) = args.disc_type.as_override() {
        info.disc_type = disc_type;
    }

    let classification = ContentTypeDetector::new().detect(&info.titles);
    println!("{}", render_scan(&source.to_string(), &info, &classification));
    Ok(())
}

fn render_scan(source: &str, info: &DiscInfo, classification: &ContentClassification) -> String {
    let mut lines = vec![format!("Disc: {}", source), format!("{:=<60}", "")];

    if let Some(label) = &info.label {
        let hint = clean_disc_label(label);
        lines.push(format!("Label: {} (search title: {})", label, hint.title));
        if let Some(season) = hint.season {
            lines.push(format!("Season hint: {}", season));
        }
    }
    lines.push(format!("Type: {}", info.disc_type));
    lines.push(format!(
        "Titles: {} (total {})",
        info.titles.len(),
        format_duration(info.total_duration())
    ));
    lines.push(format!("{:-<60}", ""));

    lines.extend(info.titles.iter().map(|t| format!("  {}", describe_title(t))));

    lines.push(format!("{:-<60}", ""));
    lines.push(format!(
        "Classification: {} (confidence {:.2}, {})",
        classification.kind,
        classification.confidence,
        classification.rule.description()
    ));
    lines.join("\n")
}
