//! Engine configuration.
//!
//! Configuration is an explicit handle constructed once at startup and
//! passed by reference into the pipeline, resolver, and catalog store —
//! there is no ambient/global lookup. It can be built programmatically or
//! loaded from TOML with the following resolution order:
//! 1. `--config <path>` (explicit path)
//! 2. `~/.promptmesh/config.toml` (user)

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{PromptMeshError, Result};

/// Engine configuration: where the worker binaries live and where assets
/// and catalogs are read from and written to.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub workers: WorkersConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: WorkersConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

/// Paths to the external worker binaries.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    /// Directory the default worker binary paths are rooted in.
    #[serde(default = "default_bin_dir")]
    pub bin_dir: PathBuf,
    /// Transcription worker binary (default: `<bin_dir>/transcribe`).
    #[serde(default)]
    pub transcribe: Option<PathBuf>,
    /// Diffusion worker binary (default: `<bin_dir>/diffuse`).
    #[serde(default)]
    pub diffuse: Option<PathBuf>,
    /// 3D-reconstruction worker binary (default: `<bin_dir>/generate`).
    #[serde(default)]
    pub generate_mesh: Option<PathBuf>,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            bin_dir: default_bin_dir(),
            transcribe: None,
            diffuse: None,
            generate_mesh: None,
        }
    }
}

fn default_bin_dir() -> PathBuf {
    PathBuf::from("bin")
}

/// Asset and catalog locations.
///
/// The bundled locations ship with the application and are read-only; the
/// user locations are writable and take precedence on lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Read-only directory of bundled 3D assets.
    #[serde(default = "default_bundled_dir")]
    pub bundled_dir: PathBuf,
    /// Writable directory for user-saved 3D assets.
    #[serde(default = "default_user_dir")]
    pub user_dir: PathBuf,
    /// Catalog filename inside each asset directory.
    #[serde(default = "default_catalog_filename")]
    pub catalog_filename: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            bundled_dir: default_bundled_dir(),
            user_dir: default_user_dir(),
            catalog_filename: default_catalog_filename(),
        }
    }
}

fn default_bundled_dir() -> PathBuf {
    PathBuf::from("viewer_assets")
}

fn default_user_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptmesh")
        .join("viewer_assets")
}

fn default_catalog_filename() -> String {
    "model_descriptions.json".to_string()
}

impl EngineConfig {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.promptmesh/config.toml`
    ///
    /// Returns defaults if no file exists and no explicit path was given.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            PromptMeshError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            PromptMeshError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(PromptMeshError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".promptmesh").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// Path to the transcription worker binary.
    pub fn transcribe_bin(&self) -> PathBuf {
        self.workers
            .transcribe
            .clone()
            .unwrap_or_else(|| self.workers.bin_dir.join("transcribe"))
    }

    /// Path to the diffusion worker binary.
    pub fn diffuse_bin(&self) -> PathBuf {
        self.workers
            .diffuse
            .clone()
            .unwrap_or_else(|| self.workers.bin_dir.join("diffuse"))
    }

    /// Path to the 3D-reconstruction worker binary.
    pub fn generate_mesh_bin(&self) -> PathBuf {
        self.workers
            .generate_mesh
            .clone()
            .unwrap_or_else(|| self.workers.bin_dir.join("generate"))
    }

    /// Path of the writable (user) catalog file.
    pub fn user_catalog_path(&self) -> PathBuf {
        self.assets.user_dir.join(&self.assets.catalog_filename)
    }

    /// Path of the read-only (bundled) catalog file.
    pub fn bundled_catalog_path(&self) -> PathBuf {
        self.assets.bundled_dir.join(&self.assets.catalog_filename)
    }
}
