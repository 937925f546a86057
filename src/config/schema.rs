/// Configuration schema and defaults for vitrine.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[source]`, `[server]`, `[panel]`, `[render]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level vitrine configuration.
///
/// Maps directly to `~/.vitrine/config.toml` and `.vitrine.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrineConfig {
    pub source: SourceConfig,
    pub server: ServerConfig,
    pub panel: PanelConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [source]
// ---------------------------------------------------------------------------

/// Where resource files are read from and how they are laid out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root directory, used when `base_url` is empty.
    pub root: PathBuf,
    /// HTTP origin serving the site. `file://` URLs are read as directories.
    pub base_url: String,
    /// Directory (relative to the site root) holding the manifest and one
    /// subdirectory per resource.
    pub resources_dir: String,
    /// Manifest file name inside `resources_dir`.
    pub manifest_file: String,
    /// Descriptor file name inside each resource directory.
    pub descriptor_file: String,
    /// Optional per-request timeout. Unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base_url: String::new(),
            resources_dir: "wp-resources".to_string(),
            manifest_file: "index.json".to_string(),
            descriptor_file: "config.json".to_string(),
            timeout_ms: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `vitrine serve`.
    pub addr: String,
    /// Open the page in the default browser on startup.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [panel]
// ---------------------------------------------------------------------------

/// Detail panel transition timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Delay between the open trigger and the "open" visual state.
    pub open_delay_ms: u64,
    /// Delay between the close trigger and clearing the panel content.
    pub clear_delay_ms: u64,
}

impl PanelConfig {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: 100,
            clear_delay_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// [render]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Heading and `<title>` of the rendered page.
    pub page_title: String,
    /// Substring that marks a note as important.
    pub important_marker: String,
    /// Escape note text. Notes are trusted markup by default.
    pub escape_notes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_title: "Educational Resources".to_string(),
            important_marker: "IMPORTANTE".to_string(),
            escape_notes: false,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `VITRINE_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

impl VitrineConfig {
    /// Annotated default configuration written by `vitrine config init`.
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }
}

const DEFAULT_TOML: &str = r#"# vitrine configuration
#
# Layers: built-in defaults < ~/.vitrine/config.toml < .vitrine.toml
#         < VITRINE_* environment variables < command-line flags

[source]
# Site root directory (used when base_url is empty)
root = "."
# HTTP origin serving the site, e.g. "http://127.0.0.1:8000"
base_url = ""
resources_dir = "wp-resources"
manifest_file = "index.json"
descriptor_file = "config.json"
# timeout_ms = 5000

[server]
addr = "127.0.0.1:8000"
open_browser = true

[panel]
open_delay_ms = 100
clear_delay_ms = 500

[render]
page_title = "Educational Resources"
# Notes containing this marker are rendered as important
important_marker = "IMPORTANTE"
# Notes are trusted markup unless this is enabled
escape_notes = false

[logging]
level = "info"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_to_defaults() {
        let parsed: VitrineConfig = toml::from_str(VitrineConfig::default_toml()).unwrap();
        let defaults = VitrineConfig::default();
        assert_eq!(parsed.source.resources_dir, defaults.source.resources_dir);
        assert_eq!(parsed.server.addr, defaults.server.addr);
        assert_eq!(parsed.panel.clear_delay_ms, 500);
        assert_eq!(parsed.render.important_marker, "IMPORTANTE");
        assert!(parsed.source.timeout_ms.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: VitrineConfig = toml::from_str("[panel]\nopen_delay_ms = 20\n").unwrap();
        assert_eq!(parsed.panel.open_delay_ms, 20);
        assert_eq!(parsed.panel.clear_delay_ms, 500);
        assert_eq!(parsed.source.manifest_file, "index.json");
    }
}
