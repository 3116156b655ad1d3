//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: SolvraAutoload CLI entry point
// Objective: Inspect how class identifiers resolve against namespace
//            registrations, from the command line or a TOML config
//=====================================================

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use solvra_autoload::{AutoloadConfig, Autoloader, PathRegistration, ProbeMode, candidates};

#[derive(Parser, Debug)]
#[command(name = "solvra_autoload", about = "SolvraAutoload resolution inspector")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and load a class identifier.
    Resolve(ResolveArgs),
    /// Print every (namespace, name) level probed for an identifier.
    Candidates(CandidatesArgs),
    /// Print registered directories in probe order.
    Paths(PathsArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RegistryArgs {
    /// TOML autoload configuration.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Namespace mapping as NS=DIR or NS=DIR@PRIORITY (NS may be empty).
    #[arg(short = 'm', long = "map", value_parser = parse_mapping)]
    pub maps: Vec<PathRegistration>,

    /// Candidate file extension.
    #[arg(long = "ext")]
    pub extension: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResolveArgs {
    pub identifier: String,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Print the resolution trace.
    #[arg(long = "debug")]
    pub debug: bool,

    /// Stop resolving at the first existing file.
    #[arg(long = "first-match")]
    pub first_match: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CandidatesArgs {
    pub identifier: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PathsArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Emit JSON instead of text.
    #[arg(long = "json")]
    pub json: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Resolve(resolve) => run_resolve(resolve),
        Command::Candidates(cands) => {
            for level in candidates(&cands.identifier) {
                let namespace = if level.namespace.is_empty() {
                    "<root>"
                } else {
                    level.namespace.as_str()
                };
                println!("{namespace}\t{}", level.local_name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Paths(paths) => run_paths(paths),
    }
}

fn run_resolve(args: ResolveArgs) -> Result<ExitCode> {
    let mut config = build_config(&args.registry)?;
    config.debug = args.debug;
    if args.first_match {
        config.probe = ProbeMode::FirstMatch;
    }
    let mut autoloader = Autoloader::with_config(config);
    let resolved = autoloader
        .load_class(&args.identifier)
        .with_context(|| format!("resolving {}", args.identifier))?;
    match resolved {
        Some(path) => {
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("not found");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_paths(args: PathsArgs) -> Result<ExitCode> {
    let autoloader = Autoloader::with_config(build_config(&args.registry)?);
    let registry = autoloader.registry();
    if args.json {
        let mut namespaces = serde_json::Map::new();
        for namespace in registry.namespaces() {
            if let Some(list) = registry.get(namespace) {
                namespaces.insert(namespace.to_string(), serde_json::to_value(list)?);
            }
        }
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(namespaces))?);
        return Ok(ExitCode::SUCCESS);
    }

    for namespace in registry.namespaces() {
        let label = if namespace.is_empty() { "<root>" } else { namespace };
        println!("{label}");
        if let Some(list) = registry.get(namespace) {
            for entry in list {
                let directory = if entry.directory().is_empty() {
                    "<working dir>"
                } else {
                    entry.directory()
                };
                println!("  {:>6}  {}", entry.priority(), directory);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build_config(args: &RegistryArgs) -> Result<AutoloadConfig> {
    let mut config = match &args.config {
        Some(path) => AutoloadConfig::load(path)?,
        None => AutoloadConfig::default(),
    };
    if let Some(ext) = &args.extension {
        config.extension = ext.trim_start_matches('.').to_string();
    }
    config.paths.extend(args.maps.iter().cloned());
    Ok(config)
}

fn parse_mapping(raw: &str) -> Result<PathRegistration, String> {
    let (namespace, target) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NS=DIR, got '{raw}'"))?;
    if target.is_empty() {
        return Err(format!("missing directory in '{raw}'"));
    }
    let registration = match target.rsplit_once('@') {
        Some((dir, priority)) if !dir.is_empty() => match priority.parse::<i32>() {
            Ok(priority) => PathRegistration::new(namespace, dir).with_priority(priority),
            Err(_) => PathRegistration::new(namespace, target),
        },
        _ => PathRegistration::new(namespace, target),
    };
    Ok(registration)
}
