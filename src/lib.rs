//! Media Renamer - name photos and videos after their capture time
//!
//! This library provides:
//! - Classification of files into a fixed set of media kinds
//! - Creation time extraction with a documented precedence rule
//! - Base-26 timestamp stems for sortable, compact filenames
//! - Camera model tags with a configurable alias table
//! - A sequential per-file pipeline that never overwrites a destination

pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
pub mod media;
pub mod naming;
pub mod os;
pub mod process;
pub mod time;

pub use cli::Cli;
pub use config::{Config, ConfigError, ToolPaths};
pub use error::{Error, Result};
pub use inspect::{ExternalTools, MetadataSource};
pub use media::MediaKind;
pub use process::{BatchSummary, FileResult, ProcessingOutcome, Processor};
