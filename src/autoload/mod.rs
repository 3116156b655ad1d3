//==================================================
// File: autoload/mod.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Namespace-driven class autoloader
// Objective: Resolve class identifiers to source files through registered
//            namespace directories and record what was loaded
//==================================================

pub mod identifier;

use crate::config::{AutoloadConfig, ProbeMode};
use crate::debug::DebugTrace;
use crate::error::AutoloadError;
use crate::host::{AutoloadHandle, HookOptions, ResolverChain};
use crate::loader::{ScriptLoader, SourceLoader};
use crate::registry::{PathList, Registry};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use identifier::{Candidate, candidates};

/// Registry of namespace directories plus the record of resolved classes.
///
/// One instance per process is the expected setup; the application owns it
/// and hands it to [`Autoloader::install`] to join the host resolver chain.
#[derive(Debug)]
pub struct Autoloader<L: SourceLoader = ScriptLoader> {
    registry: Registry,
    files: HashMap<String, PathBuf>,
    loader: L,
    trace: DebugTrace,
    extension: String,
    default_priority: i32,
    probe: ProbeMode,
    hook: HookOptions,
}

impl Default for Autoloader<ScriptLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl Autoloader<ScriptLoader> {
    pub fn new() -> Self {
        Self::with_config(AutoloadConfig::default())
    }

    pub fn with_config(config: AutoloadConfig) -> Self {
        Self::with_config_and_loader(config, ScriptLoader::new())
    }
}

impl<L: SourceLoader> Autoloader<L> {
    pub fn with_loader(loader: L) -> Self {
        Self::with_config_and_loader(AutoloadConfig::default(), loader)
    }

    pub fn with_config_and_loader(config: AutoloadConfig, loader: L) -> Self {
        let trace = if config.debug {
            DebugTrace::stdout()
        } else {
            DebugTrace::disabled()
        };
        let mut autoloader = Self {
            registry: Registry::new(),
            files: HashMap::new(),
            loader,
            trace,
            extension: config.extension,
            default_priority: config.default_priority,
            probe: config.probe,
            hook: config.hook,
        };
        if config.working_dir_fallback {
            autoloader.register_path("", "");
        }
        for registration in &config.paths {
            let priority = registration.priority.unwrap_or(autoloader.default_priority);
            autoloader.register_path_with_priority(
                &registration.namespace,
                &registration.path,
                priority,
            );
        }
        autoloader
    }

    //==================================================
    // Section 1.0 - Options
    //==================================================

    /// Toggle the stdout trace.
    pub fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.trace = if enabled {
            DebugTrace::stdout()
        } else {
            DebugTrace::disabled()
        };
        self
    }

    /// Send the trace to `writer` instead of stdout.
    pub fn set_debug_sink<W: Write + Send + 'static>(&mut self, writer: W) -> &mut Self {
        self.trace = DebugTrace::to_writer(writer);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.trace.is_enabled()
    }

    pub fn set_probe_mode(&mut self, probe: ProbeMode) -> &mut Self {
        self.probe = probe;
        self
    }

    pub fn probe_mode(&self) -> ProbeMode {
        self.probe
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn hook_options(&self) -> HookOptions {
        self.hook
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    //==================================================
    // Section 2.0 - Registry management
    //==================================================

    pub fn register_path(&mut self, namespace: &str, path: &str) -> &mut Self {
        let priority = self.default_priority;
        self.register_path_with_priority(namespace, path, priority)
    }

    pub fn register_path_with_priority(
        &mut self,
        namespace: &str,
        path: &str,
        priority: i32,
    ) -> &mut Self {
        self.registry.register(namespace, path, priority);
        self
    }

    /// Drop one directory, or the whole namespace when `path` is `None`.
    pub fn unload_path(&mut self, namespace: &str, path: Option<&str>) -> &mut Self {
        self.registry.unregister(namespace, path);
        self
    }

    pub fn is_registered(&self, namespace: &str, path: Option<&str>) -> bool {
        self.registry.is_registered(namespace, path)
    }

    pub fn registered_paths(&self) -> &HashMap<String, PathList> {
        self.registry.all()
    }

    pub fn registered_paths_for(&self, namespace: &str) -> Option<&PathList> {
        self.registry.get(namespace)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    //==================================================
    // Section 3.0 - Resolution
    //==================================================

    /// Locate and load the file defining `identifier`.
    ///
    /// Levels are probed from the most specific namespace to the root, and
    /// every existing candidate along the way is loaded. The first hit (most
    /// specific level, lowest priority value) is the one recorded. A miss is
    /// `Ok(None)`.
    pub fn load_class(&mut self, identifier: &str) -> Result<Option<PathBuf>, AutoloadError> {
        let levels = candidates(identifier);

        self.trace.start();
        self.trace.message(format_args!("load_class {identifier}"));
        if let Some(first) = levels.first() {
            self.trace
                .message(format_args!("Checking class: {}", first.local_name));
            self.trace
                .message(format_args!("Checking namespace: {}", first.namespace));
        }
        log::debug!("resolving '{}' across {} levels", identifier, levels.len());

        let outcome = self.probe_levels(identifier, &levels);
        self.trace.end();

        let resolved = outcome?;
        match &resolved {
            Some(path) => {
                log::debug!("resolved '{}' to '{}'", identifier, path.display());
                self.files.insert(identifier.to_string(), path.clone());
            }
            None => log::debug!("'{}' not found", identifier),
        }
        Ok(resolved)
    }

    fn probe_levels(
        &mut self,
        identifier: &str,
        levels: &[Candidate],
    ) -> Result<Option<PathBuf>, AutoloadError> {
        let Self {
            registry,
            loader,
            trace,
            extension,
            probe,
            ..
        } = self;

        let mut winner: Option<PathBuf> = None;
        for level in levels {
            let Some(entries) = registry.get_normalized(&level.namespace) else {
                continue;
            };

            for entry in entries {
                let candidate =
                    PathBuf::from(entry.candidate(&level.local_name, extension.as_str()));
                trace.message(format_args!("checking pathname: {}", candidate.display()));
                log::trace!(
                    "probing '{}' for '{}' (namespace '{}')",
                    candidate.display(),
                    identifier,
                    level.namespace
                );
                if !loader.exists(&candidate) {
                    continue;
                }

                trace.message(format_args!("Found: {}", candidate.display()));
                if let Err(source) = loader.load(&candidate) {
                    log::warn!("failed to load '{}': {}", candidate.display(), source);
                    return Err(AutoloadError::Load {
                        identifier: identifier.to_string(),
                        path: candidate,
                        source,
                    });
                }
                if *probe == ProbeMode::FirstMatch {
                    return Ok(Some(candidate));
                }
                if winner.is_none() {
                    winner = Some(candidate);
                }
            }
        }
        Ok(winner)
    }

    //==================================================
    // Section 4.0 - Introspection
    //==================================================

    /// File that satisfied `identifier`, as it was originally requested.
    pub fn loaded_file(&self, identifier: &str) -> Option<&Path> {
        self.files.get(identifier).map(PathBuf::as_path)
    }

    pub fn loaded_files(&self) -> &HashMap<String, PathBuf> {
        &self.files
    }

    //==================================================
    // Section 5.0 - Host hook
    //==================================================

    /// Move into a shared handle and join `chain` with the configured hook
    /// options.
    pub fn install(self, chain: &mut ResolverChain) -> AutoloadHandle<L>
    where
        L: 'static,
    {
        let options = self.hook;
        let handle = AutoloadHandle::new(self);
        chain.register(handle.clone(), options);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathRegistration;
    use crate::error::LoadError;
    use crate::loader::MemoryLoader;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    fn autoloader(files: &[&str]) -> Autoloader<MemoryLoader> {
        Autoloader::with_config_and_loader(
            AutoloadConfig::empty(),
            MemoryLoader::with_files(files.iter().copied()),
        )
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).expect("utf8 trace")
        }
    }

    #[test]
    fn lower_priority_value_wins() {
        let mut loader = autoloader(&["/low/Widget.svs", "/high/Widget.svs"]);
        loader
            .register_path_with_priority("", "/high", 50)
            .register_path_with_priority("", "/low", 10);

        let resolved = loader.load_class("Widget").expect("resolve");
        assert_eq!(resolved, Some(PathBuf::from("/low/Widget.svs")));
        assert_eq!(
            loader.loader().loads(),
            &[PathBuf::from("/low/Widget.svs"), PathBuf::from("/high/Widget.svs")]
        );
    }

    #[test]
    fn first_match_mode_loads_only_winner() {
        let mut loader = autoloader(&["/low/Widget.svs", "/high/Widget.svs"]);
        loader
            .register_path_with_priority("", "/high", 50)
            .register_path_with_priority("", "/low", 10)
            .set_probe_mode(ProbeMode::FirstMatch);

        loader.load_class("Widget").expect("resolve");
        assert_eq!(loader.loader().loads(), &[PathBuf::from("/low/Widget.svs")]);
    }

    #[test]
    fn specific_namespace_takes_precedence_over_root() {
        let mut loader = autoloader(&["/acme/Widget.svs", "/libs/Acme/Widget.svs"]);
        loader
            .register_path("", "/libs")
            .register_path("Acme", "/acme");

        assert_eq!(
            loader.load_class("Acme\\Widget").expect("resolve"),
            Some(PathBuf::from("/acme/Widget.svs"))
        );
        assert_eq!(
            loader.loader().loads(),
            &[PathBuf::from("/acme/Widget.svs"), PathBuf::from("/libs/Acme/Widget.svs")]
        );
        assert_eq!(
            loader.loaded_file("Acme\\Widget"),
            Some(Path::new("/acme/Widget.svs"))
        );
    }

    #[test]
    fn walk_continues_to_root_after_specific_hit() {
        let mut loader = autoloader(&[
            "/foo-bar/Baz.svs",
            "/foo/Bar/Baz.svs",
            "/libs/Foo/Bar/Baz.svs",
        ]);
        loader
            .register_path("", "/libs")
            .register_path("Foo", "/foo")
            .register_path("Foo.Bar", "/foo-bar");

        assert_eq!(
            loader.load_class("Foo.Bar.Baz").expect("resolve"),
            Some(PathBuf::from("/foo-bar/Baz.svs"))
        );
        assert_eq!(
            loader.loader().loads(),
            &[
                PathBuf::from("/foo-bar/Baz.svs"),
                PathBuf::from("/foo/Bar/Baz.svs"),
                PathBuf::from("/libs/Foo/Bar/Baz.svs"),
            ]
        );
    }

    #[test]
    fn first_match_mode_stops_at_most_specific_hit() {
        let mut loader = autoloader(&["/acme/Widget.svs", "/libs/Acme/Widget.svs"]);
        loader
            .register_path("", "/libs")
            .register_path("Acme", "/acme")
            .set_probe_mode(ProbeMode::FirstMatch);

        assert_eq!(
            loader.load_class("Acme\\Widget").expect("resolve"),
            Some(PathBuf::from("/acme/Widget.svs"))
        );
        assert_eq!(loader.loader().loads(), &[PathBuf::from("/acme/Widget.svs")]);
    }

    #[test]
    fn root_fallback_reconstructs_full_path() {
        let mut loader = autoloader(&["/libs/Foo/Bar/Baz.svs"]);
        loader.register_path("", "/libs");

        assert_eq!(
            loader.load_class("Foo.Bar.Baz").expect("resolve"),
            Some(PathBuf::from("/libs/Foo/Bar/Baz.svs"))
        );
    }

    #[test]
    fn intermediate_namespace_receives_partial_name() {
        let mut loader = autoloader(&["/foo/Bar/Baz.svs"]);
        loader.register_path("Foo", "/foo");
        assert_eq!(
            loader.load_class("Foo\\Bar\\Baz").expect("resolve"),
            Some(PathBuf::from("/foo/Bar/Baz.svs"))
        );
    }

    #[test]
    fn miss_leaves_cache_untouched() {
        let mut loader = autoloader(&[]);
        loader.register_path("", "/libs");
        assert_eq!(loader.load_class("Acme/Widget").expect("resolve"), None);
        assert!(loader.loaded_file("Acme/Widget").is_none());
        assert!(loader.loaded_files().is_empty());
    }

    #[test]
    fn cache_is_keyed_by_requested_identifier() {
        let mut loader = autoloader(&["/libs/Acme/Widget.svs"]);
        loader.register_path("", "/libs");
        assert!(loader.loaded_file("Acme\\Widget").is_none());

        loader.load_class("Acme\\Widget").expect("resolve");
        assert_eq!(
            loader.loaded_file("Acme\\Widget"),
            Some(Path::new("/libs/Acme/Widget.svs"))
        );
        assert!(loader.loaded_file("Acme/Widget").is_none());
    }

    #[test]
    fn load_failure_propagates_and_is_not_cached() {
        let mut memory = MemoryLoader::new();
        memory.reject("/libs/Broken.svs", "unexpected token");
        let mut loader = Autoloader::with_config_and_loader(AutoloadConfig::empty(), memory);
        loader.register_path("", "/libs");

        match loader.load_class("Broken") {
            Err(AutoloadError::Load { path, source, .. }) => {
                assert_eq!(path, PathBuf::from("/libs/Broken.svs"));
                assert!(matches!(source, LoadError::Rejected { .. }));
            }
            other => panic!("expected load error, got {other:?}"),
        }
        assert!(loader.loaded_file("Broken").is_none());
    }

    #[test]
    fn config_registrations_are_applied() {
        let config = AutoloadConfig::empty()
            .register(PathRegistration::new("Acme", "/acme").with_priority(5))
            .register(PathRegistration::new("Acme", "/vendor/acme"));
        let loader = Autoloader::with_config_and_loader(config, MemoryLoader::new());

        let list = loader.registered_paths_for("Acme").expect("registered");
        assert_eq!(list.directories(), vec!["/acme/", "/vendor/acme/"]);
        assert_eq!(list.iter().last().map(|e| e.priority()), Some(100));
    }

    #[test]
    fn working_dir_fallback_registers_empty_root() {
        let loader = Autoloader::with_loader(MemoryLoader::new());
        assert!(loader.is_registered("", Some("")));
        assert_eq!(loader.registered_paths().len(), 1);
    }

    #[test]
    fn trace_lists_every_probe_and_the_hit() {
        let capture = Capture::default();
        let mut loader = autoloader(&["/libs/Foo/Bar.svs"]);
        loader
            .register_path("Foo", "/foo")
            .register_path("", "/libs")
            .set_debug_sink(capture.clone());

        let resolved = loader.load_class("Foo\\Bar").expect("resolve");
        assert_eq!(resolved, Some(PathBuf::from("/libs/Foo/Bar.svs")));

        let text = capture.text();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("= Autoloader::load_class ="));
        assert_eq!(
            &lines[1..7],
            &[
                "load_class Foo\\Bar",
                "Checking class: Bar",
                "Checking namespace: Foo",
                "checking pathname: /foo/Bar.svs",
                "checking pathname: /libs/Foo/Bar.svs",
                "Found: /libs/Foo/Bar.svs",
            ]
        );
        assert_eq!(lines[7], "=".repeat(90));
    }

    #[test]
    fn trace_does_not_change_outcome() {
        let files = ["/a/Ns/Leaf.svs", "/b/Leaf.svs"];
        let mut quiet = autoloader(&files);
        let mut traced = autoloader(&files);
        for loader in [&mut quiet, &mut traced] {
            loader.register_path("", "/a").register_path("Ns", "/b");
        }
        traced.set_debug_sink(Capture::default());

        assert_eq!(
            quiet.load_class("Ns\\Leaf").expect("quiet"),
            traced.load_class("Ns\\Leaf").expect("traced")
        );
        assert_eq!(quiet.loaded_files(), traced.loaded_files());
    }
}
