//! Metadata collaborator backed by external programs
//!
//! - `file -i -b` for the type signature
//! - `exiftool -json` for dates, camera model and orientation
//! - `jhead -autorot` for orientation correction
//!
//! Every call blocks until the program exits; there is no timeout.

use super::{DateField, MetadataSource, Orientation};
use crate::config::ToolPaths;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tracing::trace;

/// [`MetadataSource`] that shells out to the configured tools
#[derive(Debug, Clone)]
pub struct ExternalTools {
    tools: ToolPaths,
}

impl ExternalTools {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    /// Run a tool on `path` and return its stdout, failing on non-zero exit
    fn run(&self, tool: &Path, args: &[&str], path: &Path) -> Result<String> {
        let output: Output = Command::new(tool)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| Error::Tool {
                tool: tool.display().to_string(),
                path: path.to_path_buf(),
                message: format!("Failed to execute: {}", e),
            })?;

        if !output.status.success() {
            return Err(Error::Tool {
                tool: tool.display().to_string(),
                path: path.to_path_buf(),
                message: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(?path, tool = %tool.display(), %stdout, "Tool output");
        Ok(stdout)
    }

    /// Read a single tag through `exiftool -json`
    fn exiftool_tag(&self, path: &Path, tag: &str, numeric: bool) -> Result<Option<Value>> {
        let tag_arg = format!("-{}", tag);
        let mut args = vec!["-json"];
        if numeric {
            args.push("-n");
        }
        args.push(tag_arg.as_str());

        let stdout = self.run(&self.tools.exiftool, &args, path)?;
        parse_exiftool_json(&stdout, tag).map_err(|e| Error::Tool {
            tool: self.tools.exiftool.display().to_string(),
            path: path.to_path_buf(),
            message: format!("Failed to parse JSON output: {}", e),
        })
    }
}

/// Extract `tag` from exiftool's `-json` output for a single file
fn parse_exiftool_json(json: &str, tag: &str) -> Result<Option<Value>> {
    let parsed: Value = serde_json::from_str(json)?;
    Ok(parsed
        .as_array()
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get(tag))
        .cloned())
}

/// Render a tag value as a trimmed string, dropping empty values
fn value_to_string(value: Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s,
        Value::Null => return None,
        other => other.to_string(),
    };
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl MetadataSource for ExternalTools {
    fn type_signature(&self, path: &Path) -> Result<String> {
        let stdout = self.run(&self.tools.file, &["-i", "-b"], path)?;
        Ok(stdout.trim().to_string())
    }

    fn date_field(&self, path: &Path, field: DateField) -> Result<Option<String>> {
        Ok(self
            .exiftool_tag(path, field.tag_name(), false)?
            .and_then(value_to_string))
    }

    fn camera_model(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.exiftool_tag(path, "Model", false)?.and_then(value_to_string))
    }

    fn orientation(&self, path: &Path) -> Result<Option<Orientation>> {
        Ok(self
            .exiftool_tag(path, "Orientation", true)?
            .and_then(|v| v.as_u64())
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Orientation::new))
    }

    fn correct_orientation(&self, path: &Path) -> Result<()> {
        self.run(&self.tools.jhead, &["-autorot"], path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_exiftool_json() {
        let json = r#"[{
  "SourceFile": "IMG_0001.JPG",
  "CreateDate": "2021:05:01 12:00:00"
}]"#;
        let value = parse_exiftool_json(json, "CreateDate").unwrap();
        assert_eq!(value, Some(Value::String("2021:05:01 12:00:00".into())));

        assert_eq!(parse_exiftool_json(json, "Model").unwrap(), None);
        assert!(parse_exiftool_json("not json", "Model").is_err());
        assert_eq!(parse_exiftool_json("[]", "Model").unwrap(), None);
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(
            value_to_string(Value::String("  Canon EOS 550D ".into())),
            Some("Canon EOS 550D".into())
        );
        assert_eq!(value_to_string(Value::String("   ".into())), None);
        assert_eq!(value_to_string(Value::Null), None);
        assert_eq!(value_to_string(serde_json::json!(6)), Some("6".into()));
    }

    #[test]
    fn test_missing_tool_is_tool_error() {
        let tools = ToolPaths {
            file: PathBuf::from("/nonexistent/file"),
            exiftool: PathBuf::from("/nonexistent/exiftool"),
            jhead: PathBuf::from("/nonexistent/jhead"),
        };
        let source = ExternalTools::new(tools);
        let err = source.type_signature(Path::new("photo.jpg")).unwrap_err();
        assert!(matches!(err, Error::Tool { .. }));
    }
}
