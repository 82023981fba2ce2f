//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Media Renamer - name photos and videos after their capture time
///
/// Every file in the source directory is renamed to a base-26 stamp of its
/// embedded creation time (plus the camera model for photos), given
/// rw-rw---- permissions and its capture time as modification time, and
/// moved into the photo or video directory. Existing files are never
/// overwritten.
#[derive(Parser, Debug)]
#[command(name = "media-renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// Settings from the file are used as defaults; command line
    /// arguments override them.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source directory holding the files to rename
    #[arg(short = 's', long = "srcdir")]
    pub src_dir: Option<PathBuf>,

    /// Destination directory for photos
    #[arg(short = 'i', long = "dstimgdir")]
    pub image_dir: Option<PathBuf>,

    /// Destination directory for videos
    #[arg(short = 'v', long = "dstviddir")]
    pub video_dir: Option<PathBuf>,

    /// Treat creation dates before this year as broken metadata
    #[arg(long, value_name = "YEAR", conflicts_with = "no_min_year")]
    pub min_year: Option<i32>,

    /// Accept creation dates of any year
    #[arg(long)]
    pub no_min_year: bool,

    /// Extra camera alias, e.g. --alias "Canon EOS 70D=EOS70D" (repeatable)
    #[arg(long = "alias", value_name = "MODEL=TAG", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

/// Parse `MODEL=TAG`; the model is normalized the same way camera models
/// read from files are
fn parse_alias(s: &str) -> Result<(String, String), String> {
    let (model, tag) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MODEL=TAG, got '{}'", s))?;
    let model = model.trim().replace(' ', "_");
    let tag = tag.trim();
    if model.is_empty() || tag.is_empty() {
        return Err(format!("expected MODEL=TAG, got '{}'", s));
    }
    Ok((model, tag.to_string()))
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref src_dir) = self.src_dir {
            config.src_dir = src_dir.clone();
        }
        if let Some(ref image_dir) = self.image_dir {
            config.image_dir = image_dir.clone();
        }
        if let Some(ref video_dir) = self.video_dir {
            config.video_dir = video_dir.clone();
        }
        if let Some(min_year) = self.min_year {
            config.min_year = Some(min_year);
        }
        if self.no_min_year {
            config.min_year = None;
        }
        for (model, tag) in &self.aliases {
            config.camera_aliases.insert(model.clone(), tag.clone());
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
