//! Resource sources: where manifest, descriptor and content bytes come from.
//!
//! Three implementations share the [`ResourceSource`] trait:
//!
//! - [`HttpSource`] — an HTTP origin, fetched with the synchronous `ureq` client
//! - [`DirSource`] — a local directory, read directly or behind `vitrine serve`
//! - [`MemorySource`] — an in-memory map, used by tests and embedding callers
//!
//! Paths handed to a source are always relative, `/`-separated and never
//! contain `..` segments; [`normalize_path`] enforces this for every
//! implementation.

mod dir;
mod http;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use dir::DirSource;
pub use http::HttpSource;
pub use memory::MemorySource;

use crate::config::schema::SourceConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to fetch a single resource path.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The origin answered with a non-success status.
    #[error("HTTP {code} - {reason}")]
    Status { code: u16, reason: String },
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("network error: {0}")]
    Transport(String),
    /// The path does not exist in a directory or memory source.
    #[error("not found: {0}")]
    NotFound(String),
    /// The path is not a valid relative resource path.
    #[error("invalid resource path: {0}")]
    InvalidPath(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes were fetched but are not the expected JSON shape.
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} is not valid UTF-8")]
    Utf8(String),
}

impl FetchError {
    /// Whether the failure happened before any response or file was seen.
    ///
    /// Mirrors the browser's distinction between a rejected fetch and a
    /// response with a failing status. Missing or unreadable files count as
    /// unreachable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotFound(_) | Self::Io(_))
    }
}

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// The kind of origin a source reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Http,
    /// Local files on disk.
    File,
    Memory,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A read-only store of resource files addressed by relative path.
///
/// Implementations must be shareable across the scoped threads that fetch
/// descriptors concurrently.
pub trait ResourceSource: Send + Sync {
    /// Fetch the raw bytes at `path`.
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;

    /// What kind of origin this source reads from.
    fn origin(&self) -> Origin;

    /// Human-readable location of `path`, for log lines.
    fn locate(&self, path: &str) -> String;

    /// Fetch `path` and decode it as UTF-8 text.
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let bytes = self.fetch(path)?;
        String::from_utf8(bytes).map_err(|_| FetchError::Utf8(path.to_string()))
    }
}

/// Fetch `path` from `source` and deserialize it as JSON.
pub fn fetch_json<T: DeserializeOwned>(
    source: &dyn ResourceSource,
    path: &str,
) -> Result<T, FetchError> {
    let bytes = source.fetch(path)?;
    serde_json::from_slice(&bytes).map_err(|source| FetchError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Validate and normalize a relative resource path.
///
/// Strips leading `/` and `./`, collapses empty segments and rejects any
/// `..` segment or backslash.
pub fn normalize_path(path: &str) -> Result<String, FetchError> {
    if path.contains('\\') {
        return Err(FetchError::InvalidPath(path.to_string()));
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(FetchError::InvalidPath(path.to_string())),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(FetchError::InvalidPath(path.to_string()));
    }

    Ok(segments.join("/"))
}

/// Build the source described by the resolved configuration.
///
/// A non-empty `base_url` wins over `root`; a `file://` base URL is read as a
/// local directory.
pub fn open(config: &SourceConfig) -> anyhow::Result<Box<dyn ResourceSource>> {
    let base_url = config.base_url.trim();

    if base_url.is_empty() {
        return Ok(Box::new(DirSource::new(&config.root)));
    }

    if base_url.starts_with("file://") {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("invalid base URL {base_url}: {e}"))?;
        let path = parsed
            .to_file_path()
            .map_err(|_| anyhow::anyhow!("base URL {base_url} is not a local path"))?;
        return Ok(Box::new(DirSource::new(path)));
    }

    Ok(Box::new(HttpSource::new(base_url, config.timeout_ms)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
