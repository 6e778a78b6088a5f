//! Durable asset catalog: filename → description.
//!
//! The catalog is stored as a plain JSON object in two layers: a bundled,
//! read-only catalog shipped with the application and a writable user
//! catalog. On load the layers are merged with user entries winning key
//! collisions; saves go to the user layer only. A missing or malformed
//! catalog file is an empty layer, never a fatal error — the system must
//! start with zero saved assets rather than crash.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::EngineConfig;
use crate::Result;

/// The catalog mapping. `BTreeMap` keeps iteration order stable, which
/// makes retrieval tie-breaking deterministic across index rebuilds.
pub type Catalog = BTreeMap<String, String>;

/// Two-layer catalog store (bundled + user).
#[derive(Debug, Clone)]
pub struct CatalogStore {
    bundled_path: PathBuf,
    user_path: PathBuf,
}

impl CatalogStore {
    /// Create a store with catalog paths taken from the config.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            bundled_path: config.bundled_catalog_path(),
            user_path: config.user_catalog_path(),
        }
    }

    /// Load the merged catalog: bundled first, then user entries on top.
    pub fn load(&self) -> Catalog {
        let mut catalog = Self::load_layer(&self.bundled_path);
        catalog.extend(Self::load_layer(&self.user_path));
        catalog
    }

    /// Persist the catalog to the writable (user) layer.
    ///
    /// The bundled catalog is never mutated at runtime. Parent directories
    /// are created as needed.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        if let Some(parent) = self.user_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(catalog)?;
        fs::write(&self.user_path, json)?;
        Ok(())
    }

    /// Load one catalog file. Missing, unreadable, or malformed files
    /// are an empty layer; anything other than plain absence is logged.
    fn load_layer(path: &Path) -> Catalog {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Catalog::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable catalog file, treating as empty");
                return Catalog::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed catalog file, treating as empty");
                Catalog::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn store_in(dir: &Path) -> CatalogStore {
        CatalogStore {
            bundled_path: dir.join("bundled").join("model_descriptions.json"),
            user_path: dir.join("user").join("model_descriptions.json"),
        }
    }

    fn write(path: &PathBuf, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_catalog_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        write(&store.user_path, "{not json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn unreadable_catalog_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        // A directory where the file should be fails the read with
        // something other than NotFound
        fs::create_dir_all(&store.user_path).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn user_entries_win_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        write(
            &store.bundled_path,
            r#"{"cube.obj": "bundled cube", "cone.obj": "a cone"}"#,
        );
        write(&store.user_path, r#"{"cube.obj": "my cube"}"#);

        let catalog = store.load();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["cube.obj"], "my cube");
        assert_eq!(catalog["cone.obj"], "a cone");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut catalog = Catalog::new();
        catalog.insert("a.obj".to_string(), "a red cube".to_string());
        catalog.insert("b.obj".to_string(), "a blue sphere".to_string());
        store.save(&catalog).unwrap();

        assert_eq!(store.load(), catalog);
        // save(load()) is idempotent
        store.save(&store.load()).unwrap();
        assert_eq!(store.load(), catalog);
    }

    #[test]
    fn save_never_touches_bundled_layer() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        write(&store.bundled_path, r#"{"cube.obj": "bundled cube"}"#);
        let before = fs::read_to_string(&store.bundled_path).unwrap();

        let mut catalog = store.load();
        catalog.insert("new.obj".to_string(), "something new".to_string());
        store.save(&catalog).unwrap();

        assert_eq!(fs::read_to_string(&store.bundled_path).unwrap(), before);
    }
}
