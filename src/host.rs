//==================================================
// File: host.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Host symbol-resolution callback chain
// Objective: Let the autoloader sit among other fallback resolvers
//==================================================

use crate::autoload::Autoloader;
use crate::error::AutoloadError;
use crate::loader::{ScriptLoader, SourceLoader};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags applied when a resolver joins a [`ResolverChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HookOptions {
    /// Report [`AutoloadError::Unresolved`] when this resolver misses and no
    /// other resolver finds the class.
    pub throw: bool,
    /// Try this resolver before the ones already registered.
    pub prepend: bool,
}

/// A fallback the host consults when it cannot find a class itself.
pub trait ClassResolver: Send {
    fn name(&self) -> &str;

    /// `Ok(None)` is a miss and lets the next resolver run.
    fn resolve(&mut self, identifier: &str) -> Result<Option<PathBuf>, AutoloadError>;
}

/// Adapts a closure into a [`ClassResolver`].
pub struct FnResolver<F> {
    name: String,
    func: F,
}

impl<F> FnResolver<F>
where
    F: FnMut(&str) -> Result<Option<PathBuf>, AutoloadError> + Send,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> ClassResolver for FnResolver<F>
where
    F: FnMut(&str) -> Result<Option<PathBuf>, AutoloadError> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&mut self, identifier: &str) -> Result<Option<PathBuf>, AutoloadError> {
        (self.func)(identifier)
    }
}

struct Hook {
    resolver: Box<dyn ClassResolver>,
    options: HookOptions,
}

/// Ordered resolvers tried until one produces a file.
#[derive(Default)]
pub struct ResolverChain {
    hooks: Vec<Hook>,
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R: ClassResolver + 'static>(&mut self, resolver: R, options: HookOptions) {
        log::debug!(
            "hooking resolver '{}' (prepend: {}, throw: {})",
            resolver.name(),
            options.prepend,
            options.throw
        );
        let hook = Hook {
            resolver: Box::new(resolver),
            options,
        };
        if options.prepend {
            self.hooks.insert(0, hook);
        } else {
            self.hooks.push(hook);
        }
    }

    /// Resolver names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.resolver.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// First hit wins. Resolver errors propagate immediately.
    pub fn resolve(&mut self, identifier: &str) -> Result<Option<PathBuf>, AutoloadError> {
        let mut throw = false;
        for hook in &mut self.hooks {
            if let Some(path) = hook.resolver.resolve(identifier)? {
                return Ok(Some(path));
            }
            throw |= hook.options.throw;
        }
        if throw {
            return Err(AutoloadError::Unresolved {
                identifier: identifier.to_string(),
            });
        }
        Ok(None)
    }
}

//==================================================
// Section 2.0 - Shared autoloader handle
//==================================================

/// Shared ownership of an installed [`Autoloader`].
///
/// All lookups and registry edits go through one lock. The lock is not
/// reentrant: a loader must not resolve further classes from inside `load`.
pub struct AutoloadHandle<L: SourceLoader = ScriptLoader> {
    inner: Arc<Mutex<Autoloader<L>>>,
}

impl<L: SourceLoader> Clone for AutoloadHandle<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: SourceLoader> AutoloadHandle<L> {
    pub fn new(autoloader: Autoloader<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(autoloader)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Autoloader<L>> {
        self.inner.lock()
    }
}

impl<L: SourceLoader> ClassResolver for AutoloadHandle<L> {
    fn name(&self) -> &str {
        "Autoloader::load_class"
    }

    fn resolve(&mut self, identifier: &str) -> Result<Option<PathBuf>, AutoloadError> {
        self.inner.lock().load_class(identifier)
    }
}
