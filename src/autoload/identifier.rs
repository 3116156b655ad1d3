//==================================================
// File: autoload/identifier.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Split class identifiers into lookup levels
// Objective: Precompute every (namespace, local name) pair probed for a class
//==================================================

use crate::registry::normalize_namespace;

/// Separator of legacy flattened class names such as `Zend_Db_Table`.
pub const FLATTENED_SEPARATOR: char = '_';

/// One generalization level of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub namespace: String,
    /// Path fragment appended to each directory registered for `namespace`.
    pub local_name: String,
}

impl Candidate {
    fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }
}

/// Lookup levels for `identifier`, most specific namespace first.
///
/// The last level always has the root namespace, and an identifier with N
/// namespace segments yields N + 1 levels.
pub fn candidates(identifier: &str) -> Vec<Candidate> {
    let normalized = normalize_namespace(identifier);
    if normalized.is_empty() {
        return Vec::new();
    }

    let (mut namespace, mut local_name) = match normalized.rsplit_once('/') {
        Some((namespace, name)) => (namespace.to_string(), name.to_string()),
        None => (String::new(), normalized),
    };

    if namespace.is_empty() {
        if let Some((flat_namespace, name)) = split_flattened(&local_name) {
            namespace = flat_namespace;
            local_name = name;
        }
    }

    let mut levels = vec![Candidate::new(namespace.as_str(), local_name.as_str())];
    while !namespace.is_empty() {
        match namespace.rsplit_once('/') {
            Some((parent, last)) => {
                local_name = format!("{last}/{local_name}");
                namespace = parent.to_string();
            }
            None => {
                local_name = format!("{namespace}/{local_name}");
                namespace.clear();
            }
        }
        levels.push(Candidate::new(namespace.as_str(), local_name.as_str()));
    }
    levels
}

// `Zend_Db_Table` -> (`Zend_Db`, `Table`)
fn split_flattened(name: &str) -> Option<(String, String)> {
    let (head, tail) = name.rsplit_once(FLATTENED_SEPARATOR)?;
    if head.trim_matches(FLATTENED_SEPARATOR).is_empty() || tail.is_empty() {
        return None;
    }
    Some((head.to_string(), tail.to_string()))
}
