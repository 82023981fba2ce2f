//! Metadata collaborator interface
//!
//! The pipeline never talks to `file`, `exiftool` or `jhead` directly; it
//! goes through [`MetadataSource`]. [`ExternalTools`] is the implementation
//! used by the binary.

mod external;

pub use external::ExternalTools;

use crate::error::Result;
use std::path::Path;

/// Embedded date fields, in the order they are consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// `CreateDate`
    CreateDate,
    /// `DateTimeOriginal`
    DateTimeOriginal,
}

impl DateField {
    /// Tag name as understood by exiftool
    pub fn tag_name(&self) -> &'static str {
        match self {
            DateField::CreateDate => "CreateDate",
            DateField::DateTimeOriginal => "DateTimeOriginal",
        }
    }
}

/// EXIF orientation value (1-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation(u8);

impl Orientation {
    pub fn new(value: u8) -> Option<Self> {
        (1..=8).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Orientation 1 means the pixels are already stored upright
    pub fn is_upright(&self) -> bool {
        self.0 == 1
    }
}

/// Everything the renamer needs to know about, or do to, a media file
/// that it cannot do with plain filesystem calls.
pub trait MetadataSource {
    /// Raw type signature, e.g. `image/jpeg; charset=binary`
    fn type_signature(&self, path: &Path) -> Result<String>;

    /// Raw value of a date field, `None` when the tag is absent
    fn date_field(&self, path: &Path, field: DateField) -> Result<Option<String>>;

    /// Camera model string as stored in the file
    fn camera_model(&self, path: &Path) -> Result<Option<String>>;

    /// Orientation tag, `None` when absent
    fn orientation(&self, path: &Path) -> Result<Option<Orientation>>;

    /// Rewrite the image so its pixels are upright
    fn correct_orientation(&self, path: &Path) -> Result<()>;
}
