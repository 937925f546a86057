/// In-memory resource source.
///
/// Holds files in a map and can simulate failing paths, so loaders can be
/// exercised without a server or a filesystem.
use std::collections::HashMap;

use super::{FetchError, Origin, ResourceSource, normalize_path};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    statuses: HashMap<String, u16>,
    unreachable: bool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path`.
    pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Make `path` answer with an HTTP-style failing status.
    pub fn with_status(mut self, path: &str, code: u16) -> Self {
        if let Ok(key) = normalize_path(path) {
            self.statuses.insert(key, code);
        }
        self
    }

    /// Make every fetch fail as if the origin could not be reached.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn insert(&mut self, path: &str, contents: impl Into<Vec<u8>>) {
        if let Ok(key) = normalize_path(path) {
            self.files.insert(key, contents.into());
        }
    }
}

impl ResourceSource for MemorySource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let key = normalize_path(path)?;

        if self.unreachable {
            return Err(FetchError::Transport(format!("{key}: connection refused")));
        }
        if let Some(&code) = self.statuses.get(&key) {
            return Err(FetchError::Status {
                code,
                reason: status_reason(code).to_string(),
            });
        }

        self.files
            .get(&key)
            .cloned()
            .ok_or(FetchError::NotFound(key))
    }

    fn origin(&self) -> Origin {
        Origin::Memory
    }

    fn locate(&self, path: &str) -> String {
        format!("memory:{path}")
    }
}

fn status_reason(code: u16) -> &'static str {
    match code {
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}
