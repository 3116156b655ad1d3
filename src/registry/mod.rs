//==================================================
// File: registry/mod.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Namespace prefix to directory registry
// Objective: Keep per-namespace search directories ordered by priority
//==================================================

pub mod path;

use serde::Serialize;
use std::collections::HashMap;

pub use path::{PathKey, normalize_directory, normalize_namespace};

/// Priority applied when a registration does not name one.
pub const DEFAULT_PRIORITY: i32 = 100;

//==================================================
// Section 1.0 - Entries
//==================================================

/// One search directory registered under a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathEntry {
    #[serde(skip)]
    key: PathKey,
    directory: String,
    priority: i32,
    #[serde(skip)]
    sequence: u64,
}

impl PathEntry {
    /// Normalized directory, always ending in `/` unless empty.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn key(&self) -> PathKey {
        self.key
    }

    /// Full candidate path for a local class name.
    pub fn candidate(&self, local_name: &str, extension: &str) -> String {
        format!("{}{}.{}", self.directory, local_name, extension)
    }
}

/// Directories of one namespace, sorted by priority then registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathList {
    entries: Vec<PathEntry>,
}

impl PathList {
    pub fn iter(&self) -> std::slice::Iter<'_, PathEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: PathKey) -> Option<&PathEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn contains(&self, key: PathKey) -> bool {
        self.get(key).is_some()
    }

    /// Directories in probe order.
    pub fn directories(&self) -> Vec<&str> {
        self.entries.iter().map(PathEntry::directory).collect()
    }

    fn upsert(&mut self, directory: String, priority: i32, sequence: u64) {
        let key = PathKey::of_normalized(&directory);
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(existing) => existing.priority = priority,
            None => self.entries.push(PathEntry {
                key,
                directory,
                priority,
                sequence,
            }),
        }
        self.sort_by_priority();
    }

    fn remove(&mut self, key: PathKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        before != self.entries.len()
    }

    fn sort_by_priority(&mut self) {
        self.entries.sort_by_key(|entry| (entry.priority, entry.sequence));
    }
}

impl<'a> IntoIterator for &'a PathList {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

//==================================================
// Section 2.0 - Registry
//==================================================

#[derive(Debug, Clone, Default)]
pub struct Registry {
    paths: HashMap<String, PathList>,
    next_sequence: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update `directory` under `namespace`.
    ///
    /// Re-registering a directory only changes its priority; it keeps the
    /// position it was first registered at among equal priorities.
    pub fn register(&mut self, namespace: &str, directory: &str, priority: i32) {
        let namespace = normalize_namespace(namespace);
        let directory = normalize_directory(directory);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        log::debug!(
            "registering '{}' for namespace '{}' at priority {}",
            directory,
            namespace,
            priority
        );
        self.paths
            .entry(namespace)
            .or_default()
            .upsert(directory, priority, sequence);
    }

    /// Remove one directory, or the whole namespace when `directory` is `None`.
    ///
    /// Removing the last directory leaves the namespace registered but empty.
    pub fn unregister(&mut self, namespace: &str, directory: Option<&str>) {
        let namespace = normalize_namespace(namespace);
        match directory {
            Some(directory) => {
                if let Some(list) = self.paths.get_mut(&namespace) {
                    if list.remove(PathKey::of(directory)) {
                        log::debug!("unregistered '{}' from '{}'", directory, namespace);
                    }
                }
            }
            None => {
                if self.paths.remove(&namespace).is_some() {
                    log::debug!("unregistered namespace '{}'", namespace);
                }
            }
        }
    }

    pub fn is_registered(&self, namespace: &str, directory: Option<&str>) -> bool {
        let namespace = normalize_namespace(namespace);
        match (self.paths.get(&namespace), directory) {
            (Some(list), Some(directory)) => list.contains(PathKey::of(directory)),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Entries for a single namespace; `None` when it was never registered.
    pub fn get(&self, namespace: &str) -> Option<&PathList> {
        self.paths.get(&normalize_namespace(namespace))
    }

    /// Lookup by an already normalized namespace, used on the resolution path.
    pub(crate) fn get_normalized(&self, namespace: &str) -> Option<&PathList> {
        self.paths.get(namespace)
    }

    pub fn all(&self) -> &HashMap<String, PathList> {
        &self.paths
    }

    /// Namespaces sorted for stable display.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.paths.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
