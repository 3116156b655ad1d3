//==================================================
// File: loader.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Host load mechanism behind the autoloader
// Objective: Check candidate files and pull located sources into the host
//==================================================

use crate::error::LoadError;
use crate::registry::path::hash_bytes;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// How the host checks and loads candidate files.
pub trait SourceLoader: Send {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Make the definitions in `path` available to the host.
    fn load(&mut self, path: &Path) -> Result<(), LoadError>;
}

//==================================================
// Section 1.0 - Script loader
//==================================================

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub source: String,
    pub fingerprint: String,
}

/// Reads located scripts into memory, once per physical file.
#[derive(Debug, Default)]
pub struct ScriptLoader {
    loaded: HashMap<PathBuf, LoadedSource>,
    order: Vec<PathBuf>,
}

impl ScriptLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self, path: &Path) -> Option<&str> {
        self.loaded
            .get(&canonical_path_buf(path))
            .map(|loaded| loaded.source.as_str())
    }

    pub fn fingerprint(&self, path: &Path) -> Option<&str> {
        self.loaded
            .get(&canonical_path_buf(path))
            .map(|loaded| loaded.fingerprint.as_str())
    }

    /// Canonical paths in the order they were first loaded.
    pub fn loaded_paths(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains_key(&canonical_path_buf(path))
    }

    fn compute_fingerprint(bytes: &[u8]) -> String {
        format!(
            "{:016x}",
            hash_bytes(
                bytes
                    .iter()
                    .copied()
                    .chain(env!("CARGO_PKG_VERSION").as_bytes().iter().copied()),
            )
        )
    }
}

impl SourceLoader for ScriptLoader {
    fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        let canonical = canonical_path_buf(path);
        if self.loaded.contains_key(&canonical) {
            log::trace!("'{}' already loaded", canonical.display());
            return Ok(());
        }

        let bytes = fs::read(&canonical).map_err(|source| LoadError::Io {
            path: canonical.clone(),
            source,
        })?;
        let fingerprint = Self::compute_fingerprint(&bytes);
        let source = String::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8 {
            path: canonical.clone(),
        })?;

        log::debug!("loaded '{}' ({})", canonical.display(), fingerprint);
        self.order.push(canonical.clone());
        self.loaded.insert(
            canonical.clone(),
            LoadedSource {
                path: canonical,
                source,
                fingerprint,
            },
        );
        Ok(())
    }
}

fn canonical_path_buf(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

//==================================================
// Section 2.0 - In-memory loader
//==================================================

/// Virtual file set; records every load instead of touching the filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashSet<PathBuf>,
    rejected: HashMap<PathBuf, String>,
    loads: Vec<PathBuf>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut loader = Self::new();
        for file in files {
            loader.add_file(file);
        }
        loader
    }

    pub fn add_file<P: Into<PathBuf>>(&mut self, path: P) {
        self.files.insert(path.into());
    }

    /// Make loading `path` fail even though it exists.
    pub fn reject<P: Into<PathBuf>>(&mut self, path: P, reason: impl Into<String>) {
        let path = path.into();
        self.files.insert(path.clone());
        self.rejected.insert(path, reason.into());
    }

    /// Every load in call order, duplicates included.
    pub fn loads(&self) -> &[PathBuf] {
        &self.loads
    }
}

impl SourceLoader for MemoryLoader {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        if let Some(reason) = self.rejected.get(path) {
            return Err(LoadError::Rejected {
                path: path.to_path_buf(),
                reason: reason.clone(),
            });
        }
        self.loads.push(path.to_path_buf());
        Ok(())
    }
}
