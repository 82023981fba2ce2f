//! Destination path construction

use crate::camera::CameraTag;
use crate::media::{DestinationClass, MediaKind};
use std::path::{Path, PathBuf};

/// The two destination directories, one per [`DestinationClass`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub image_dir: PathBuf,
    pub video_dir: PathBuf,
}

impl Destinations {
    pub fn new(image_dir: impl Into<PathBuf>, video_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            video_dir: video_dir.into(),
        }
    }

    pub fn dir_for(&self, class: DestinationClass) -> &Path {
        match class {
            DestinationClass::Image => &self.image_dir,
            DestinationClass::Video => &self.video_dir,
        }
    }
}

/// File name for a renamed file: `<stem>[_<camera>].<ext>`
pub fn file_name(kind: MediaKind, encoded: &str, camera: Option<&CameraTag>) -> Option<String> {
    let ext = kind.extension()?;
    Some(match camera {
        Some(camera) => format!("{}_{}.{}", encoded, camera, ext),
        None => format!("{}.{}", encoded, ext),
    })
}

/// Full destination path, `None` for [`MediaKind::Unknown`]
pub fn destination_path(
    destinations: &Destinations,
    kind: MediaKind,
    encoded: &str,
    camera: Option<&CameraTag>,
) -> Option<PathBuf> {
    let dir = destinations.dir_for(kind.destination_class()?);
    Some(dir.join(file_name(kind, encoded, camera)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn destinations() -> Destinations {
        Destinations::new("/data/photos", "/data/videos")
    }

    #[test]
    fn test_photo_with_camera() {
        let camera = CameraTag::from_model("Canon EOS 550D", &Config::default())
            .unwrap()
            .unwrap();
        let dest = destination_path(&destinations(), MediaKind::PhotoJpeg, "SUHZPXTXW", Some(&camera));
        assert_eq!(dest, Some(PathBuf::from("/data/photos/SUHZPXTXW_EOS550D.jpg")));
    }

    #[test]
    fn test_photo_without_camera() {
        let dest = destination_path(&destinations(), MediaKind::PhotoJpeg, "SUHZPXTXW", None);
        assert_eq!(dest, Some(PathBuf::from("/data/photos/SUHZPXTXW.jpg")));
    }

    #[test]
    fn test_videos_go_to_video_dir() {
        let d = destinations();
        assert_eq!(
            destination_path(&d, MediaKind::VideoQuicktime, "ABC", None),
            Some(PathBuf::from("/data/videos/ABC.mov"))
        );
        assert_eq!(
            destination_path(&d, MediaKind::VideoMp4, "ABC", None),
            Some(PathBuf::from("/data/videos/ABC.mp4"))
        );
        assert_eq!(
            destination_path(&d, MediaKind::VideoAvi, "ABC", None),
            Some(PathBuf::from("/data/videos/ABC.avi"))
        );
    }

    #[test]
    fn test_unknown_kind_has_no_destination() {
        assert_eq!(destination_path(&destinations(), MediaKind::Unknown, "ABC", None), None);
        assert_eq!(file_name(MediaKind::Unknown, "ABC", None), None);
    }

    #[test]
    fn test_same_inputs_same_path() {
        let d = destinations();
        let a = destination_path(&d, MediaKind::VideoMp4, "SUHZPXTXW", None);
        let b = destination_path(&d, MediaKind::VideoMp4, "SUHZPXTXW", None);
        assert_eq!(a, b);
    }
}
