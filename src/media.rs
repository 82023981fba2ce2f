//! Media kinds and classification of type signatures

use std::fmt;

/// Which destination directory a media kind is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationClass {
    /// Photo destination directory
    Image,
    /// Video destination directory
    Video,
}

/// Closed set of media kinds the renamer handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// JPEG photo
    PhotoJpeg,
    /// QuickTime movie
    VideoQuicktime,
    /// MPEG-4 video
    VideoMp4,
    /// AVI video
    VideoAvi,
    /// Anything else
    Unknown,
}

/// Signature tokens in match order, as reported by `file -i -b`
const SIGNATURE_TOKENS: &[(&str, MediaKind)] = &[
    ("jpeg", MediaKind::PhotoJpeg),
    ("quicktime", MediaKind::VideoQuicktime),
    ("mp4", MediaKind::VideoMp4),
    ("x-msvideo", MediaKind::VideoAvi),
];

impl MediaKind {
    /// Classify a raw type signature such as `image/jpeg; charset=binary`
    pub fn from_signature(signature: &str) -> Self {
        let signature = signature.to_ascii_lowercase();
        SIGNATURE_TOKENS
            .iter()
            .find(|(token, _)| signature.contains(token))
            .map(|(_, kind)| *kind)
            .unwrap_or(MediaKind::Unknown)
    }

    /// File extension used for the renamed file
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            MediaKind::PhotoJpeg => Some("jpg"),
            MediaKind::VideoQuicktime => Some("mov"),
            MediaKind::VideoMp4 => Some("mp4"),
            MediaKind::VideoAvi => Some("avi"),
            MediaKind::Unknown => None,
        }
    }

    /// Destination directory class
    pub fn destination_class(&self) -> Option<DestinationClass> {
        match self {
            MediaKind::PhotoJpeg => Some(DestinationClass::Image),
            MediaKind::VideoQuicktime | MediaKind::VideoMp4 | MediaKind::VideoAvi => {
                Some(DestinationClass::Video)
            }
            MediaKind::Unknown => None,
        }
    }

    /// Photos get a camera tag and orientation correction
    pub fn is_photo(&self) -> bool {
        matches!(self, MediaKind::PhotoJpeg)
    }

    pub fn is_video(&self) -> bool {
        matches!(self.destination_class(), Some(DestinationClass::Video))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::PhotoJpeg => "photo-jpeg",
            MediaKind::VideoQuicktime => "video-quicktime",
            MediaKind::VideoMp4 => "video-mp4",
            MediaKind::VideoAvi => "video-avi",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signature() {
        assert_eq!(
            MediaKind::from_signature("image/jpeg; charset=binary"),
            MediaKind::PhotoJpeg
        );
        assert_eq!(
            MediaKind::from_signature("video/quicktime; charset=binary"),
            MediaKind::VideoQuicktime
        );
        assert_eq!(
            MediaKind::from_signature("video/mp4; charset=binary"),
            MediaKind::VideoMp4
        );
        assert_eq!(
            MediaKind::from_signature("video/x-msvideo; charset=binary"),
            MediaKind::VideoAvi
        );
        assert_eq!(
            MediaKind::from_signature("IMAGE/JPEG"),
            MediaKind::PhotoJpeg
        );
        assert_eq!(
            MediaKind::from_signature("text/plain; charset=us-ascii"),
            MediaKind::Unknown
        );
        assert_eq!(MediaKind::from_signature(""), MediaKind::Unknown);
    }

    #[test]
    fn test_kind_mappings() {
        assert_eq!(MediaKind::PhotoJpeg.extension(), Some("jpg"));
        assert_eq!(MediaKind::VideoQuicktime.extension(), Some("mov"));
        assert_eq!(MediaKind::VideoMp4.extension(), Some("mp4"));
        assert_eq!(MediaKind::VideoAvi.extension(), Some("avi"));
        assert_eq!(MediaKind::Unknown.extension(), None);

        assert_eq!(
            MediaKind::PhotoJpeg.destination_class(),
            Some(DestinationClass::Image)
        );
        assert_eq!(
            MediaKind::VideoAvi.destination_class(),
            Some(DestinationClass::Video)
        );
        assert!(MediaKind::PhotoJpeg.is_photo());
        assert!(!MediaKind::VideoMp4.is_photo());
        assert!(MediaKind::VideoMp4.is_video());
        assert!(!MediaKind::Unknown.is_video());
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaKind::PhotoJpeg.to_string(), "photo-jpeg");
        assert_eq!(MediaKind::VideoAvi.to_string(), "video-avi");
    }
}
