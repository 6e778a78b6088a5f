//! Shared fixtures: stub worker scripts and a deterministic embedder.

#![allow(dead_code)]

#[cfg(unix)]
use std::fs;
use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;

use promptmesh::{EngineConfig, TextEmbedder};

/// Write an executable stub worker script into `bin_dir`.
///
/// The script body runs under `/bin/sh` with `$1` = request file and
/// `$2` = response file, matching the worker invocation contract.
#[cfg(unix)]
pub fn write_worker(bin_dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(bin_dir).unwrap();
    let path = bin_dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// An engine config rooted entirely inside `root`: workers under
/// `root/bin`, bundled assets under `root/bundled`, user assets under
/// `root/user`.
pub fn config_in(root: &Path) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.workers.bin_dir = root.join("bin");
    config.assets.bundled_dir = root.join("bundled");
    config.assets.user_dir = root.join("user");
    config
}

/// Deterministic embedder: projects text onto a fixed set of keyword
/// axes. Close enough to semantic similarity for catalog-sized tests,
/// with no model download.
pub struct KeywordEmbedder;

const AXES: &[&str] = &["cube", "sphere", "chair", "dinosaur", "red", "blue"];

impl TextEmbedder for KeywordEmbedder {
    fn embed(&mut self, text: &str) -> promptmesh::Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(AXES
            .iter()
            .map(|axis| if lower.contains(axis) { 1.0 } else { 0.0 })
            .collect())
    }
}
