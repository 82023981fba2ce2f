//! Per-file transform pipeline and the batch driver
//!
//! Each file goes through the same fixed sequence of steps:
//! - classify the type signature
//! - read the creation date
//! - build the camera tag (photos)
//! - correct orientation and restore ownership (photos)
//! - normalize permissions
//! - set access/modification time to the creation time
//! - move to the destination without overwriting anything
//!
//! A failing step ends only the current file. The driver turns every
//! file into exactly one [`ProcessingOutcome`] and carries on.

use crate::camera::CameraTag;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::inspect::MetadataSource;
use crate::media::MediaKind;
use crate::naming::{Destinations, destination_path};
use crate::os;
use crate::time::{CreationTimestamp, extract_creation_time};
use filetime::FileTime;
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span, warn};
use walkdir::WalkDir;

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Renamed and moved into its destination directory
    Moved { destination: PathBuf, kind: MediaKind },
    /// No usable creation date
    SkippedUnknownDate,
    /// The computed destination is already taken
    SkippedTargetExists { destination: PathBuf },
    /// Not one of the supported media kinds
    SkippedUnsupportedType,
    /// Any other per-file error (camera tag too long, tool or I/O failure)
    Failed { reason: String },
}

impl ProcessingOutcome {
    /// Map the pipeline result onto an outcome
    fn from_result(result: Result<(PathBuf, MediaKind)>) -> Self {
        match result {
            Ok((destination, kind)) => ProcessingOutcome::Moved { destination, kind },
            Err(Error::UnsupportedType { .. }) => ProcessingOutcome::SkippedUnsupportedType,
            Err(Error::UnknownDate { .. }) => ProcessingOutcome::SkippedUnknownDate,
            Err(Error::TargetExists { destination, .. }) => {
                ProcessingOutcome::SkippedTargetExists { destination }
            }
            Err(e) => ProcessingOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Path the file had when the batch started
    pub source: PathBuf,
    pub outcome: ProcessingOutcome,
}

/// Counts accumulated over one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub photos_moved: usize,
    pub videos_moved: usize,
    pub unknown_date: usize,
    pub target_exists: usize,
    pub unsupported_type: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Moved { kind, .. } if kind.is_video() => self.videos_moved += 1,
            ProcessingOutcome::Moved { .. } => self.photos_moved += 1,
            ProcessingOutcome::SkippedUnknownDate => self.unknown_date += 1,
            ProcessingOutcome::SkippedTargetExists { .. } => self.target_exists += 1,
            ProcessingOutcome::SkippedUnsupportedType => self.unsupported_type += 1,
            ProcessingOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Files left in the source directory
    pub fn not_processed(&self) -> usize {
        self.unknown_date + self.target_exists + self.unsupported_type + self.failed
    }

    pub fn total(&self) -> usize {
        self.photos_moved + self.videos_moved + self.not_processed()
    }

    pub fn summary(&self) -> String {
        format!(
            "Photos: {}, Videos: {}, Not processed: {} (unknown date: {}, target exists: {}, unsupported: {}, failed: {})",
            self.photos_moved,
            self.videos_moved,
            self.not_processed(),
            self.unknown_date,
            self.target_exists,
            self.unsupported_type,
            self.failed
        )
    }
}

/// The per-file state machine
pub struct Pipeline<'a, S: ?Sized> {
    source: &'a S,
    config: &'a Config,
    destinations: &'a Destinations,
}

impl<'a, S: MetadataSource + ?Sized> Pipeline<'a, S> {
    pub fn new(source: &'a S, config: &'a Config, destinations: &'a Destinations) -> Self {
        Self {
            source,
            config,
            destinations,
        }
    }

    /// Run all steps on one file, returning where it was moved to
    pub fn run(&self, path: &Path) -> Result<(PathBuf, MediaKind)> {
        let kind = self.classify(path)?;
        debug!(?path, %kind, "Classified");

        let timestamp = extract_creation_time(self.source, path, self.config)
            .ok_or_else(|| Error::UnknownDate {
                path: path.to_path_buf(),
            })?;
        debug!(?path, %timestamp, "Dated");

        let camera = if kind.is_photo() {
            self.camera_tag(path)?
        } else {
            None
        };

        let destination =
            destination_path(self.destinations, kind, &timestamp.encoded(), camera.as_ref())
                .ok_or_else(|| Error::UnsupportedType {
                    path: path.to_path_buf(),
                    signature: kind.to_string(),
                })?;
        // Checked before anything touches the file; the move itself never replaces
        self.ensure_free(path, &destination)?;

        if kind.is_photo() {
            self.correct_orientation(path)?;
        }

        os::set_file_mode(path, self.config.file_mode)?;
        debug!(?path, mode = %format!("{:o}", self.config.file_mode), "Permissions set");

        set_times(path, &timestamp)?;
        debug!(?path, %timestamp, "Times set");

        move_file(path, &destination)?;

        Ok((destination, kind))
    }

    fn classify(&self, path: &Path) -> Result<MediaKind> {
        let signature = self.source.type_signature(path).map_err(|e| {
            warn!(?path, error = %e, "Type detection failed");
            Error::UnsupportedType {
                path: path.to_path_buf(),
                signature: e.to_string(),
            }
        })?;

        match MediaKind::from_signature(&signature) {
            MediaKind::Unknown => Err(Error::UnsupportedType {
                path: path.to_path_buf(),
                signature,
            }),
            kind => Ok(kind),
        }
    }

    fn camera_tag(&self, path: &Path) -> Result<Option<CameraTag>> {
        match self.source.camera_model(path)? {
            Some(model) => CameraTag::from_model(&model, self.config),
            None => Ok(None),
        }
    }

    /// Rotate the pixels upright, then give the file back to its owner
    fn correct_orientation(&self, path: &Path) -> Result<()> {
        let orientation = match self.source.orientation(path)? {
            Some(o) if !o.is_upright() => o,
            _ => return Ok(()),
        };

        let owner = os::file_owner(path)?;
        debug!(?path, orientation = orientation.value(), "Correcting orientation");

        let rotated = self.source.correct_orientation(path);
        // Restore even when rotation failed; the tool may have rewritten the file
        let restored = os::restore_owner(path, owner);
        rotated?;
        restored
    }

    fn ensure_free(&self, path: &Path, destination: &Path) -> Result<()> {
        if destination.exists() {
            return Err(Error::TargetExists {
                source_path: path.to_path_buf(),
                destination: destination.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Set access and modification time to the creation time (local wall time)
fn set_times(path: &Path, timestamp: &CreationTimestamp) -> Result<()> {
    let time = FileTime::from_unix_time(timestamp.unix_seconds_local(), 0);
    filetime::set_file_times(path, time, time).map_err(|e| Error::FileTime {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Move without overwriting.
///
/// The file is hard linked into place, which fails if the destination
/// exists, and the source name is removed afterwards. Across filesystems an
/// exclusive copy takes the place of the link. If the source cannot be
/// removed the new name is dropped again, so the file only ever ends up in
/// one place.
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    match fs::hard_link(source, dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::TargetExists {
                source_path: source.to_path_buf(),
                destination: dest.to_path_buf(),
            });
        }
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::CrossesDevices | io::ErrorKind::Unsupported
            ) =>
        {
            debug!(?source, ?dest, error = %e, "Hard link not possible, copying instead");
            copy_exclusive(source, dest)?;
        }
        Err(e) => return Err(Error::Io(e)),
    }

    if let Err(e) = fs::remove_file(source) {
        if let Err(cleanup) = fs::remove_file(dest) {
            error!(?dest, error = %cleanup, "Failed to remove destination after failed move");
        }
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Copy into a file that must not exist yet, keeping mode, times and owner.
/// A partially written destination is removed again.
fn copy_exclusive(source: &Path, dest: &Path) -> Result<()> {
    let mut reader = File::open(source)?;
    let writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::TargetExists {
                source_path: source.to_path_buf(),
                destination: dest.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

    let copied = fill_copy(&mut reader, writer, source, dest);
    if copied.is_err() {
        let _ = fs::remove_file(dest);
    }
    copied
}

fn fill_copy(reader: &mut File, mut writer: File, source: &Path, dest: &Path) -> Result<()> {
    io::copy(reader, &mut writer)?;
    writer.sync_all()?;
    drop(writer);

    let metadata = fs::metadata(source)?;
    fs::set_permissions(dest, metadata.permissions())?;
    os::restore_owner(dest, os::file_owner(source)?)?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(dest, atime, mtime).map_err(|e| Error::FileTime {
        path: dest.to_path_buf(),
        message: e.to_string(),
    })
}

/// Batch driver over one source directory
pub struct Processor<S> {
    config: Config,
    destinations: Destinations,
    source: S,
    summary: BatchSummary,
}

impl<S: MetadataSource> Processor<S> {
    pub fn new(config: Config, source: S) -> Self {
        let destinations = Destinations::new(config.image_dir.clone(), config.video_dir.clone());
        Self {
            config,
            destinations,
            source,
            summary: BatchSummary::new(),
        }
    }

    /// Snapshot of the regular files directly inside the source directory,
    /// in file name order
    pub fn snapshot(&self) -> Result<VecDeque<PathBuf>> {
        let mut queue = VecDeque::new();
        for entry in WalkDir::new(&self.config.src_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                queue.push_back(entry.into_path());
            } else {
                debug!(path = ?entry.path(), "Skipping non-regular entry");
            }
        }
        Ok(queue)
    }

    /// Run the batch
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        self.run_with_progress(|_| {})
    }

    /// Run the batch, reporting each file as soon as it reaches its
    /// terminal state
    pub fn run_with_progress<F>(&mut self, mut on_file: F) -> Result<Vec<FileResult>>
    where
        F: FnMut(&FileResult),
    {
        let _span = span!(Level::INFO, "processor_run").entered();

        let mut queue = self.snapshot()?;
        info!(count = queue.len(), src_dir = %self.config.src_dir.display(), "Found files");

        let pipeline = Pipeline::new(&self.source, &self.config, &self.destinations);
        let mut results = Vec::with_capacity(queue.len());

        while let Some(path) = queue.pop_front() {
            let _file_span = span!(Level::DEBUG, "process_file", ?path).entered();

            let outcome = ProcessingOutcome::from_result(pipeline.run(&path));
            match &outcome {
                ProcessingOutcome::Moved { destination, kind } => {
                    info!(source = ?path, destination = ?destination, %kind, "Moved file");
                }
                ProcessingOutcome::Failed { reason } => {
                    error!(?path, %reason, "Failed to process file");
                }
                other => {
                    info!(?path, outcome = ?other, "Skipped file");
                }
            }

            self.summary.record(&outcome);
            let result = FileResult {
                source: path,
                outcome,
            };
            on_file(&result);
            results.push(result);
        }

        info!("{}", self.summary.summary());
        Ok(results)
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }
}
