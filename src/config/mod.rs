/// Configuration system for vitrine.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::VitrineConfig::default()`]
/// 2. **User global config** — `~/.vitrine/config.toml`
/// 3. **Project local config** — `.vitrine.toml` in the current working directory
/// 4. **Environment variables** — `VITRINE_*` overrides
/// 5. **Command-line flags** — applied by the binary via [`Overrides`]
///
/// Later layers override earlier ones. Malformed TOML files are ignored.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::VitrineConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration (defaults → global → project → env).
pub fn load() -> VitrineConfig {
    let mut config = VitrineConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed.
fn load_toml_file(path: Option<PathBuf>) -> Option<VitrineConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Command-line overrides, the highest-precedence layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub base_url: Option<String>,
    pub addr: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut VitrineConfig) {
        if let Some(root) = &self.root {
            config.source.root = root.clone();
            // An explicit root means "read this directory".
            if self.base_url.is_none() {
                config.source.base_url.clear();
            }
        }
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.vitrine/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vitrine").join("config.toml"))
}

/// Path to the project local config: `.vitrine.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".vitrine.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Supported variables:
/// - `VITRINE_ROOT` — site root directory
/// - `VITRINE_BASE_URL` — HTTP origin serving the site
/// - `VITRINE_ADDR` — listen address for `vitrine serve`
/// - `VITRINE_ESCAPE_NOTES` — escape note markup (`1`/`true`/`yes`/`on`)
///
/// `VITRINE_LOG` is read by the logging setup, not here.
fn apply_env_overrides(config: &mut VitrineConfig) {
    if let Ok(val) = std::env::var("VITRINE_ROOT")
        && !val.is_empty()
    {
        config.source.root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("VITRINE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Ok(val) = std::env::var("VITRINE_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Ok(val) = std::env::var("VITRINE_ESCAPE_NOTES") {
        config.render.escape_notes = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.vitrine/config.toml`.
///
/// Returns an error if the file already exists and `force` is not set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, VitrineConfig::default_toml()).context("failed to write config file")
}

/// Set a single dotted key (e.g. `panel.open_delay_ms`) in the global config.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    // Start from the existing file, or from serialized defaults so every
    // known key is present for type inference.
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&VitrineConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Refuse to write something the loader would later ignore.
    let rendered = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<VitrineConfig>(&rendered)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, rendered).context("failed to write config file")
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The type of the existing value decides how `raw_value` is parsed; a key
/// without a current value is stored as a string, or as an integer when it
/// parses as one.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section_path, leaf) = match key.rsplit_once('.') {
        Some((section, leaf)) => (Some(section), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    if let Some(section_path) = section_path {
        for part in section_path.split('.') {
            current = current
                .get_mut(part)
                .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
        }
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected a table above '{key}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => toml::Value::Integer(
            raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?,
        ),
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => match raw_value.parse::<i64>() {
            Ok(n) => toml::Value::Integer(n),
            Err(_) => toml::Value::String(raw_value.to_string()),
        },
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Render a resolved config as TOML.
pub fn to_toml(config: &VitrineConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
