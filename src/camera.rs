//! Camera model normalization for filename tags

use crate::config::Config;
use crate::error::{Error, Result};
use std::fmt;

/// Camera model reduced to a short, filename-safe tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraTag(String);

impl CameraTag {
    /// Normalize a raw model string.
    ///
    /// Surrounding whitespace is removed, inner spaces become underscores
    /// and known long names are replaced by their alias. Returns `Ok(None)`
    /// for an empty model and an error when the result is still too long
    /// to be used in a filename.
    pub fn from_model(raw: &str, config: &Config) -> Result<Option<Self>> {
        let normalized = raw.trim().replace(' ', "_");
        if normalized.is_empty() {
            return Ok(None);
        }

        let tag = match config.camera_alias(&normalized) {
            Some(alias) => alias.to_string(),
            None => normalized,
        };

        if tag.chars().count() > config.max_camera_model_len {
            return Err(Error::CameraModelTooLong {
                model: tag,
                max: config.max_camera_model_len,
            });
        }

        Ok(Some(Self(tag)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CameraTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_applied_after_normalization() {
        let config = Config::default();
        let tag = CameraTag::from_model("  Canon EOS 550D \n", &config).unwrap();
        assert_eq!(tag.unwrap().as_str(), "EOS550D");
    }

    #[test]
    fn test_unknown_model_keeps_underscored_name() {
        let config = Config::default();
        let tag = CameraTag::from_model("iPhone 6", &config).unwrap().unwrap();
        assert_eq!(tag.to_string(), "iPhone_6");
    }

    #[test]
    fn test_empty_model_has_no_tag() {
        let config = Config::default();
        assert_eq!(CameraTag::from_model("   ", &config).unwrap(), None);
    }

    #[test]
    fn test_long_model_rejected() {
        let config = Config {
            max_camera_model_len: 8,
            ..Config::default()
        };
        let err = CameraTag::from_model("PowerShot SX700 HS", &config).unwrap_err();
        assert!(matches!(err, Error::CameraModelTooLong { max: 8, .. }));

        // An alias can bring a long model under the limit
        let tag = CameraTag::from_model("Canon EOS 550D", &config).unwrap();
        assert_eq!(tag.unwrap().as_str(), "EOS550D");
    }
}
