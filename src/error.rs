//==================================================
// File: error.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Error types for the autoloader core
// Objective: Separate host load failures from unresolved lookups
//==================================================

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure reported by a host [`SourceLoader`](crate::loader::SourceLoader).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("'{}' is not valid UTF-8 source", .path.display())]
    InvalidUtf8 { path: PathBuf },
    #[error("host rejected '{}': {reason}", .path.display())]
    Rejected { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::InvalidUtf8 { path }
            | LoadError::Rejected { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum AutoloadError {
    /// A located file could not be loaded by the host.
    #[error("class '{identifier}' located at '{}' but failed to load", .path.display())]
    Load {
        identifier: String,
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    /// Raised by the resolver chain only, never by a single lookup.
    #[error("class '{identifier}' could not be resolved")]
    Unresolved { identifier: String },
}

//==================================================
// End of file
//==================================================
