//==============================================
// File: tests/host_chain.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Exercise the autoloader inside a host resolver chain
// Objective: Validate install order, throw behaviour and shared access
//==============================================

use solvra_autoload::{
    AutoloadConfig, AutoloadError, Autoloader, ClassResolver, FnResolver, HookOptions,
    MemoryLoader, PathRegistration, ResolverChain,
};
use std::path::PathBuf;
use std::thread;

fn memory_autoloader(hook: HookOptions, files: &[&str]) -> Autoloader<MemoryLoader> {
    let config = AutoloadConfig {
        hook,
        ..AutoloadConfig::empty()
    }
    .register(PathRegistration::new("", "/libs"));
    Autoloader::with_config_and_loader(config, MemoryLoader::with_files(files.iter().copied()))
}

fn builtin_resolver() -> impl ClassResolver {
    FnResolver::new("builtin", |identifier: &str| {
        Ok((identifier == "Builtin").then(|| PathBuf::from("<builtin>")))
    })
}

#[test]
fn install_appends_by_default() {
    let mut chain = ResolverChain::new();
    chain.register(builtin_resolver(), HookOptions::default());
    let handle =
        memory_autoloader(HookOptions::default(), &["/libs/Widget.svs"]).install(&mut chain);

    assert_eq!(chain.names(), vec!["builtin", "Autoloader::load_class"]);
    assert_eq!(
        chain.resolve("Builtin").expect("builtin"),
        Some(PathBuf::from("<builtin>"))
    );
    assert_eq!(
        chain.resolve("Widget").expect("autoload"),
        Some(PathBuf::from("/libs/Widget.svs"))
    );
    assert!(handle.lock().loaded_file("Builtin").is_none());
    assert_eq!(
        handle.lock().loaded_file("Widget"),
        Some(std::path::Path::new("/libs/Widget.svs"))
    );
}

#[test]
fn prepend_runs_autoloader_first() {
    let mut chain = ResolverChain::new();
    chain.register(builtin_resolver(), HookOptions::default());
    let prepend = HookOptions {
        prepend: true,
        ..HookOptions::default()
    };
    let handle = memory_autoloader(prepend, &["/libs/Builtin.svs"]).install(&mut chain);

    assert_eq!(chain.names(), vec!["Autoloader::load_class", "builtin"]);
    assert_eq!(
        chain.resolve("Builtin").expect("resolve"),
        Some(PathBuf::from("/libs/Builtin.svs"))
    );
    assert_eq!(handle.lock().loader().loads().len(), 1);
}

#[test]
fn throw_flag_surfaces_unresolved_classes() {
    let mut chain = ResolverChain::new();
    let strict = HookOptions {
        throw: true,
        ..HookOptions::default()
    };
    memory_autoloader(strict, &[]).install(&mut chain);

    match chain.resolve("Missing\\Thing") {
        Err(AutoloadError::Unresolved { identifier }) => assert_eq!(identifier, "Missing\\Thing"),
        other => panic!("expected unresolved error, got {other:?}"),
    }
}

#[test]
fn load_errors_propagate_through_chain() {
    let mut loader = MemoryLoader::new();
    loader.reject("/libs/Broken.svs", "parse failure");
    let config = AutoloadConfig::empty().register(PathRegistration::new("", "/libs"));
    let mut chain = ResolverChain::new();
    Autoloader::with_config_and_loader(config, loader).install(&mut chain);
    chain.register(builtin_resolver(), HookOptions::default());

    assert!(matches!(
        chain.resolve("Broken"),
        Err(AutoloadError::Load { .. })
    ));
}

#[test]
fn handle_serializes_access_across_threads() {
    let files: Vec<String> = (0..8).map(|i| format!("/libs/Worker{i}.svs")).collect();
    let file_refs: Vec<&str> = files.iter().map(String::as_str).collect();
    let mut chain = ResolverChain::new();
    let handle = memory_autoloader(HookOptions::default(), &file_refs).install(&mut chain);

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let handle = handle.clone();
            thread::spawn(move || {
                handle
                    .lock()
                    .load_class(&format!("Worker{i}"))
                    .expect("resolve")
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().expect("join").is_some());
    }

    let autoloader = handle.lock();
    assert_eq!(autoloader.loaded_files().len(), 8);
    assert_eq!(autoloader.loader().loads().len(), 8);
}

#[test]
fn registry_edits_through_handle_affect_chain() {
    let mut chain = ResolverChain::new();
    let handle =
        memory_autoloader(HookOptions::default(), &["/vendor/Late.svs"]).install(&mut chain);

    assert_eq!(chain.resolve("Late").expect("before"), None);
    handle.lock().register_path("", "/vendor");
    assert_eq!(
        chain.resolve("Late").expect("after"),
        Some(PathBuf::from("/vendor/Late.svs"))
    );
}

//==============================================
// End of file
//==============================================
