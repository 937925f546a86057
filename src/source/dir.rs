/// Local directory source.
///
/// Reading straight from disk is what a page opened via `file://` would do,
/// so this source reports [`Origin::File`]. Whether the page is served is
/// tracked separately, as [`crate::catalog::Access`].
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{FetchError, Origin, ResourceSource, normalize_path};

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let path = normalize_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, s| acc.join(s)))
    }
}

impl ResourceSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.resolve(path)?;
        tracing::debug!(path = %full.display(), "reading");

        match fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FetchError::NotFound(full.display().to_string()))
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }

    fn origin(&self) -> Origin {
        Origin::File
    }

    fn locate(&self, path: &str) -> String {
        match self.resolve(path) {
            Ok(full) => full.display().to_string(),
            Err(_) => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("wp-resources/a")).unwrap();
        fs::write(dir.path().join("wp-resources/a/config.json"), "{}").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch("wp-resources/a/config.json").unwrap(), b"{}");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path());
        let err = source.fetch("wp-resources/index.json").unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[test]
    fn refuses_to_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path().join("site"));
        assert!(matches!(
            source.fetch("../outside.txt").unwrap_err(),
            FetchError::InvalidPath(_)
        ));
    }
}
