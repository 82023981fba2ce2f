//! Media Renamer - name photos and videos after their capture time
//!
//! Checks the environment, then hands the source directory to the
//! library's batch driver and prints one line per file plus a tally.

use anyhow::{Context, Result, bail};
use clap::Parser;
use media_renamer::process::{FileResult, ProcessingOutcome};
use media_renamer::{Cli, Config, ExternalTools, Processor, os};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Coloured console output for progress lines and the final tally.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colours
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_key_value(key: &str, value: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// One processed file: icon, source name, destination or reason
    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest_or_msg: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(status_icon).with(status_color).bold()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(source).italic()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(dest_or_msg).with(CliTheme::HINT)));
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", Config::sample_config());
        return Ok(());
    }

    setup_logging(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "Media Renamer starting");

    let config = load_config(&cli)?;
    let config = validate_config(config)?;

    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    cli_output::print_key_value("Source", &config.src_dir.display().to_string());
    cli_output::print_key_value("Photos", &config.image_dir.display().to_string());
    cli_output::print_key_value("Videos", &config.video_dir.display().to_string());
    cli_output::print_separator();

    let source = ExternalTools::new(config.tools.clone());
    let mut processor = Processor::new(config, source);

    if let Err(e) = processor.run_with_progress(print_file_result) {
        error!(error = %e, "Processing failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    use cli_output::*;
    let summary = processor.summary();
    print_separator();
    print_stat("Photos moved", summary.photos_moved, CliTheme::SUCCESS);
    print_stat("Videos moved", summary.videos_moved, CliTheme::SUCCESS);
    print_stat("Not processed", summary.not_processed(), CliTheme::WARNING);
    print_stat("Total", summary.total(), CliTheme::ACCENT);
    if summary.not_processed() > 0 {
        print_stat("  unknown date", summary.unknown_date, CliTheme::HINT);
        print_stat("  target exists", summary.target_exists, CliTheme::HINT);
        print_stat("  unsupported type", summary.unsupported_type, CliTheme::HINT);
        print_stat("  failed", summary.failed, CliTheme::ERROR);
    }

    Ok(())
}

/// Progress line for one file
fn print_file_result(result: &FileResult) {
    use cli_output::{CliTheme, print_result};

    let name = result
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.source.display().to_string());

    match &result.outcome {
        ProcessingOutcome::Moved { destination, .. } => print_result(
            "✓",
            CliTheme::SUCCESS,
            &name,
            &format!("→ {}", destination.display()),
        ),
        ProcessingOutcome::SkippedUnknownDate => {
            print_result("⊘", CliTheme::WARNING, &name, "unknown creation date")
        }
        ProcessingOutcome::SkippedTargetExists { destination } => print_result(
            "≡",
            CliTheme::ACCENT,
            &name,
            &format!("target exists: {}", destination.display()),
        ),
        ProcessingOutcome::SkippedUnsupportedType => {
            print_result("⊘", CliTheme::WARNING, &name, "unsupported type")
        }
        ProcessingOutcome::Failed { reason } => print_result("✗", CliTheme::ERROR, &name, reason),
    }
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Check directories, privileges and tools; nothing is touched on failure
fn validate_config(mut config: Config) -> Result<Config> {
    config.src_dir = resolve_dir("Source", &config.src_dir)?;
    config.image_dir = resolve_dir("Photo destination", &config.image_dir)?;
    config.video_dir = resolve_dir("Video destination", &config.video_dir)?;

    if !os::has_admin_privileges() {
        bail!("Root privileges are required to restore file ownership after rotation");
    }

    let missing = config.tools.missing();
    if !missing.is_empty() {
        let list = missing
            .iter()
            .map(|(name, path)| format!("{} ({})", name, path.display()))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("Required tools not found: {}", list);
    }

    Ok(config)
}

/// Require an existing directory and return its absolute form
fn resolve_dir(label: &str, dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        bail!("{} directory not given", label);
    }
    if !dir.is_dir() {
        bail!("{} is not a directory: {}", label, dir.display());
    }
    dir.canonicalize()
        .with_context(|| format!("Failed to resolve {} directory {}", label, dir.display()))
}

/// Setup logging on stderr
fn setup_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
