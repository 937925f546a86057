//! Manifest and descriptor loading.
//!
//! The manifest (`wp-resources/index.json`) lists resource identifiers; each
//! identifier has a descriptor (`wp-resources/<id>/config.json`). Loading
//! fetches the manifest, then every descriptor concurrently on scoped
//! threads, joins all outcomes and keeps the successful ones in manifest
//! order.
//!
//! A manifest failure aborts the load with a [`CatalogError`] whose message
//! tells the user what to check. A descriptor failure only drops that card.

pub mod descriptor;

use std::collections::HashSet;
use std::thread;

use serde::Serialize;
use thiserror::Error;

pub use descriptor::{Card, Descriptor, Manifest, NoteKind};

use crate::config::schema::SourceConfig;
use crate::source::{FetchError, Origin, ResourceSource, fetch_json};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Relative locations of the manifest, descriptors and content files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub resources_dir: String,
    pub manifest_file: String,
    pub descriptor_file: String,
}

impl ResourcePaths {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            resources_dir: config.resources_dir.trim_matches('/').to_string(),
            manifest_file: config.manifest_file.clone(),
            descriptor_file: config.descriptor_file.clone(),
        }
    }

    pub fn manifest(&self) -> String {
        format!("{}/{}", self.resources_dir, self.manifest_file)
    }

    pub fn descriptor(&self, id: &str) -> String {
        format!("{}/{}/{}", self.resources_dir, id, self.descriptor_file)
    }

    /// Path of a content-source file, relative to its resource directory.
    pub fn content(&self, id: &str, src: &str) -> String {
        format!("{}/{}/{}", self.resources_dir, id, src.trim_start_matches('/'))
    }
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self::from_config(&SourceConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// How the page reaches its files, which decides the guidance a manifest
/// failure gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// The page is served over HTTP (`vitrine serve` or a remote origin).
    Served,
    /// The files are read straight from a directory, with no server.
    Direct,
}

impl Access {
    /// The access a source implies when nothing serves it.
    pub fn of(source: &dyn ResourceSource) -> Self {
        match source.origin() {
            Origin::File => Self::Direct,
            Origin::Http | Origin::Memory => Self::Served,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load the manifest, with user-facing guidance.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "Failed to load {path}:\n\
         • The files are being read directly, without a server\n\
         • Serve the site locally (e.g. `vitrine serve` or `python -m http.server 8000`)"
    )]
    NoServer {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error(
        "Failed to load {path}:\n\
         • Check that {path} exists\n\
         • Check the file permissions"
    )]
    Missing {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("Failed to load {path}:\n{source}")]
    Other {
        path: String,
        #[source]
        source: FetchError,
    },
}

impl CatalogError {
    fn classify(access: Access, path: String, source: FetchError) -> Self {
        if access == Access::Direct {
            Self::NoServer { path, source }
        } else if source.is_unreachable() {
            Self::Missing { path, source }
        } else {
            Self::Other { path, source }
        }
    }

    /// The underlying fetch failure.
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            Self::NoServer { source, .. } | Self::Missing { source, .. } | Self::Other { source, .. } => {
                source
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Fetch the manifest and return its identifiers in listed order.
pub fn get_available_resources(
    source: &dyn ResourceSource,
    paths: &ResourcePaths,
    access: Access,
) -> Result<Vec<String>, CatalogError> {
    let path = paths.manifest();

    if access == Access::Direct {
        tracing::warn!(
            "reading resources without a server; serve the site (e.g. `vitrine serve`) for the full experience"
        );
    }
    tracing::info!(location = %source.locate(&path), "loading manifest");

    match fetch_json::<Manifest>(source, &path) {
        Ok(manifest) => {
            tracing::info!(count = manifest.resources.len(), "manifest lists resources");
            Ok(manifest.resources)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load manifest");
            Err(CatalogError::classify(access, path, e))
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog loading
// ---------------------------------------------------------------------------

/// Result of a full load: the cards that resolved plus the ones that didn't.
#[derive(Debug)]
pub struct Catalog {
    /// Identifiers listed in the manifest, before deduplication.
    pub listed: usize,
    pub cards: Vec<Card>,
    pub failures: Vec<(String, FetchError)>,
}

/// Load the manifest and every descriptor it lists.
pub fn load_catalog(
    source: &dyn ResourceSource,
    paths: &ResourcePaths,
    access: Access,
) -> Result<Catalog, CatalogError> {
    let listed = get_available_resources(source, paths, access)?;
    let ids = dedup_ids(&listed);

    let results: Vec<(String, Result<Descriptor, FetchError>)> = thread::scope(|scope| {
        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let path = paths.descriptor(id);
                (*id, scope.spawn(move || fetch_json::<Descriptor>(source, &path)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(id, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(FetchError::Transport("descriptor fetch panicked".to_string()))
                });
                (id.to_string(), result)
            })
            .collect()
    });

    let mut cards = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(descriptor) => cards.push(Card::new(id, descriptor)),
            Err(e) => {
                tracing::warn!(resource = %id, error = %e, "dropping resource");
                failures.push((id, e));
            }
        }
    }

    tracing::info!(loaded = cards.len(), failed = failures.len(), "resources loaded");

    Ok(Catalog {
        listed: listed.len(),
        cards,
        failures,
    })
}

/// Keep the first occurrence of each identifier.
fn dedup_ids(listed: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    listed
        .iter()
        .map(String::as_str)
        .filter(|id| {
            let fresh = seen.insert(*id);
            if !fresh {
                tracing::warn!(resource = %id, "duplicate identifier in manifest, keeping first");
            }
            fresh
        })
        .collect()
}

/// What the card container should show after a load.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoadOutcome {
    /// Cards to render. May be empty when every descriptor failed.
    Cards { cards: Vec<Card> },
    /// The manifest listed no identifiers.
    Empty { message: String },
    /// The manifest could not be loaded.
    Failed { message: String },
}

impl LoadOutcome {
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Cards { cards } => cards,
            Self::Empty { .. } | Self::Failed { .. } => &[],
        }
    }
}

/// Load everything and reduce it to what the page displays.
pub fn load_cards(
    source: &dyn ResourceSource,
    paths: &ResourcePaths,
    access: Access,
) -> LoadOutcome {
    match load_catalog(source, paths, access) {
        Ok(catalog) if catalog.listed == 0 => LoadOutcome::Empty {
            message: format!("No resources listed in {}", paths.manifest()),
        },
        Ok(catalog) => LoadOutcome::Cards {
            cards: catalog.cards,
        },
        Err(e) => LoadOutcome::Failed {
            message: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
