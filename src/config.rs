//! Configuration types for the media renamer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in camera aliases, keyed by the normalized model string
/// (trimmed, spaces replaced by underscores).
///
/// Regional and firmware names of the same body map to one alias so that
/// filenames stay stable when a camera reports itself differently.
pub const DEFAULT_CAMERA_ALIASES: &[(&str, &str)] = &[
    ("Canon_EOS_550D", "EOS550D"),
    ("Canon_EOS_REBEL_T2i", "EOS550D"),
    ("Canon_EOS_Kiss_X4", "EOS550D"),
    ("Canon_EOS_400D_DIGITAL", "EOS400D"),
    ("Canon_EOS_DIGITAL_REBEL_XTi", "EOS400D"),
    ("Canon_EOS_Kiss_Digital_X", "EOS400D"),
    ("Canon_EOS_5D_Mark_III", "EOS5D3"),
    ("Canon_PowerShot_SX230_HS", "SX230HS"),
    ("Canon_PowerShot_G7_X_Mark_II", "G7X2"),
    ("Canon_DIGITAL_IXUS_70", "IXUS70"),
];

/// Default permission bits applied to every processed file (rw-rw----)
pub const DEFAULT_FILE_MODE: u32 = 0o660;

/// Default lower bound for plausible capture years
pub const DEFAULT_MIN_YEAR: i32 = 2000;

/// Default maximum length of the camera tag in a filename
pub const DEFAULT_MAX_CAMERA_MODEL_LEN: usize = 24;

/// Install locations of the external collaborator programs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Type sniffer (`file -i -b`)
    pub file: PathBuf,
    /// Metadata reader (`exiftool -json`)
    pub exiftool: PathBuf,
    /// Orientation corrector (`jhead -autorot`)
    pub jhead: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            file: PathBuf::from("/usr/bin/file"),
            exiftool: PathBuf::from("/usr/bin/exiftool"),
            jhead: PathBuf::from("/usr/bin/jhead"),
        }
    }
}

impl ToolPaths {
    /// Name/path pairs, in the order they are checked at startup
    pub fn all(&self) -> [(&'static str, &Path); 3] {
        [
            ("file", self.file.as_path()),
            ("exiftool", self.exiftool.as_path()),
            ("jhead", self.jhead.as_path()),
        ]
    }

    /// Tools that are not present at their configured location
    pub fn missing(&self) -> Vec<(&'static str, PathBuf)> {
        self.all()
            .into_iter()
            .filter(|(_, path)| !path.is_file())
            .map(|(name, path)| (name, path.to_path_buf()))
            .collect()
    }
}

/// Configuration for the media renamer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the files to rename
    pub src_dir: PathBuf,

    /// Destination directory for photos
    pub image_dir: PathBuf,

    /// Destination directory for videos
    pub video_dir: PathBuf,

    /// External program locations
    pub tools: ToolPaths,

    /// Permission bits set on every file before it is moved
    pub file_mode: u32,

    /// Creation dates before this year are treated as metadata errors.
    /// `None` accepts any year.
    pub min_year: Option<i32>,

    /// Longest camera tag accepted as a filename component
    pub max_camera_model_len: usize,

    /// Additional camera aliases; entries here take precedence over the
    /// built-in table
    pub camera_aliases: BTreeMap<String, String>,

    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::new(),
            image_dir: PathBuf::new(),
            video_dir: PathBuf::new(),
            tools: ToolPaths::default(),
            file_mode: DEFAULT_FILE_MODE,
            min_year: Some(DEFAULT_MIN_YEAR),
            max_camera_model_len: DEFAULT_MAX_CAMERA_MODEL_LEN,
            camera_aliases: BTreeMap::new(),
            verbose: false,
        }
    }
}

impl Config {
    /// Look up the short alias for a normalized camera model
    pub fn camera_alias(&self, model: &str) -> Option<&str> {
        if let Some(alias) = self.camera_aliases.get(model) {
            return Some(alias.as_str());
        }
        DEFAULT_CAMERA_ALIASES
            .iter()
            .find(|(long, _)| *long == model)
            .map(|(_, short)| *short)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Media Renamer Configuration File
# This file uses TOML format (https://toml.io)
# Command line options override the values given here.

# Directory holding the files to rename
src_dir = "/srv/import"

# Destination directories
image_dir = "/srv/photos"
video_dir = "/srv/videos"

# Permission bits for processed files, as a decimal number
# 432 = 0o660 (owner and group read/write, others nothing)
file_mode = 432

# Creation dates before this year are treated as broken metadata.
# Set to 0 to accept any year.
min_year = 2000

# Longest camera tag allowed in a filename
max_camera_model_len = 24

verbose = false

# Locations of the external programs
[tools]
file = "/usr/bin/file"
exiftool = "/usr/bin/exiftool"
jhead = "/usr/bin/jhead"

# Extra camera aliases (normalized model = short tag).
# Spaces in the model string are replaced by underscores before lookup.
[camera_aliases]
"NIKON_CORPORATION_NIKON_D7000" = "D7000"
"#
        .to_string()
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_alias_lookup() {
        let config = Config::default();
        assert_eq!(config.camera_alias("Canon_EOS_550D"), Some("EOS550D"));
        assert_eq!(config.camera_alias("Canon_EOS_REBEL_T2i"), Some("EOS550D"));
        assert_eq!(config.camera_alias("iPhone_6"), None);
    }

    #[test]
    fn test_user_alias_overrides_builtin() {
        let mut config = Config::default();
        config
            .camera_aliases
            .insert("Canon_EOS_550D".into(), "T2i".into());
        assert_eq!(config.camera_alias("Canon_EOS_550D"), Some("T2i"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config.file_mode, 0o660);
        assert_eq!(config.min_year, Some(2000));
        assert_eq!(config.tools, ToolPaths::default());
        assert_eq!(
            config.camera_alias("NIKON_CORPORATION_NIKON_D7000"),
            Some("D7000")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("image_dir = \"/photos\"").unwrap();
        assert_eq!(config.image_dir, PathBuf::from("/photos"));
        assert_eq!(config.file_mode, DEFAULT_FILE_MODE);
        assert_eq!(config.min_year, Some(DEFAULT_MIN_YEAR));
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "file_mode = \"not a number\"").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
