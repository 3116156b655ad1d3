//==================================================
// File: registry/path.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Directory and namespace normalization helpers
// Objective: Give every registered directory one canonical spelling and key
//==================================================

use serde::Serialize;
use std::fmt;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x1000_0000_01b3;

/// Canonical separator for namespaces and registered directories.
pub const SEPARATOR: char = '/';

/// Stable key of a normalized directory path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PathKey(u64);

impl PathKey {
    /// Key of a directory, normalizing it first.
    pub fn of(directory: &str) -> Self {
        Self::of_normalized(&normalize_directory(directory))
    }

    pub fn of_normalized(normalized: &str) -> Self {
        PathKey(hash_bytes(normalized.bytes()))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// FNV-1a over a byte stream.
pub fn hash_bytes<I: IntoIterator<Item = u8>>(iter: I) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in iter {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Convert backslashes to `/` and guarantee exactly one trailing separator.
///
/// Empty input stays empty so that a root registration with no directory
/// probes bare relative file names.
pub fn normalize_directory(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let unified = path.replace('\\', "/");
    let mut trimmed = unified.trim_end_matches(SEPARATOR).to_string();
    trimmed.push(SEPARATOR);
    trimmed
}

/// Normalize a namespace or class identifier to `/`-separated segments.
///
/// Accepts `\`, `::`, `.` and `/` as separators and drops empty segments, so
/// `\Foo\Bar`, `Foo::Bar` and `Foo.Bar` all become `Foo/Bar`.
pub fn normalize_namespace(name: &str) -> String {
    let unified = name.replace("::", "/").replace(['\\', '.'], "/");
    unified
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
