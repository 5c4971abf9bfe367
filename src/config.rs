use crate::error::{MailforgeError, MailforgeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for the documents wrapped around transpiled markup.
///
/// Every key is optional in YAML; missing keys take the defaults below.
///
/// ```yaml
/// export:
///   title: Spring Sale
///   maxWidth: 640
/// send:
///   fallbackBackground: "#fafafa"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailforgeConfig {
    pub export: ExportOptions,
    pub send: SendOptions,
}

/// Options for the stand-alone export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub title: String,
    /// Maximum content width in pixels.
    pub max_width: u32,
    pub page_background: String,
    pub content_background: String,
    pub content_padding: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Your Email".to_string(),
            max_width: 600,
            page_background: "#f4f4f4".to_string(),
            content_background: "#ffffff".to_string(),
            content_padding: "20px".to_string(),
        }
    }
}

/// Options for the body handed to the mail composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendOptions {
    /// Used when the captured editor background is empty or `transparent`.
    pub fallback_background: String,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            fallback_background: "#ffffff".to_string(),
        }
    }
}

impl MailforgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML configuration document. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> MailforgeResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> MailforgeResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| MailforgeError::io(path, e))?;
        Self::from_yaml(&yaml)
    }
}
