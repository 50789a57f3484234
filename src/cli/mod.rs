//! The Sprig Command-Line Interface.
//!
//! Parses arguments, builds a configured [`Engine`], and dispatches to the
//! subcommand handlers. Every failure is rendered through miette and turns
//! into a non-zero exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use walkdir::WalkDir;

use crate::atoms::{register_all_atoms, AtomRegistry, SharedOutput};
use crate::cli::args::{Command, SprigArgs};
use crate::cli::output::{print_forms, print_heading, print_trace, StdoutSink};
use crate::config::EngineConfig;
use crate::engine::{run_on_session_stack, Engine};
use crate::errors::{print_error, ErrorKind, ErrorReporting, Phase, SprigResult};
use crate::repl::run_repl;

pub mod args;
pub mod output;

/// Extension of source files picked up when a directory is passed to `run`.
pub const SOURCE_EXTENSION: &str = "scm";

/// The main entry point for the CLI. The session runs on a thread whose
/// stack is sized for the configured depth limit.
pub fn run() {
    let args = SprigArgs::parse();
    let outcome = load_config(&args).and_then(|config| {
        let command = args.command.unwrap_or(Command::Repl);
        run_on_session_stack(config.max_depth, || dispatch(command, &config))?
    });
    if let Err(e) = outcome {
        print_error(e);
        process::exit(1);
    }
}

/// The config file, if any, with `--max-depth` applied on top.
fn load_config(args: &SprigArgs) -> SprigResult<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    Ok(config)
}

fn dispatch(command: Command, config: &EngineConfig) -> SprigResult<()> {
    let mut engine = Engine::with_config(SharedOutput::new(StdoutSink), config);

    match command {
        Command::Repl => {
            run_repl(&mut engine, config);
            Ok(())
        }
        Command::Run { paths } => {
            for file in collect_sources(&paths)? {
                engine.load_file(&file)?;
            }
            Ok(())
        }
        Command::Expand { file, trace } => {
            let source = read_source(&file)?;
            let name = file.display().to_string();
            if trace {
                let (forms, steps) = engine.trace_str(&name, &source)?;
                print_trace(&steps);
                print_heading("--- Canonical forms ---");
                print_forms(&forms);
            } else {
                print_forms(&engine.expand_str(&name, &source)?);
            }
            Ok(())
        }
        Command::ListAtoms => {
            let mut registry = AtomRegistry::new();
            register_all_atoms(&mut registry);
            for name in registry.list() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

/// Expands directories into their `*.scm` files (sorted by path); plain
/// files are kept as given.
pub fn collect_sources(paths: &[PathBuf]) -> SprigResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Phase::Io.report(ErrorKind::Io {
                    message: e.to_string(),
                })
            })?;
            let is_source = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == SOURCE_EXTENSION);
            if is_source {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn read_source(path: &Path) -> SprigResult<String> {
    fs::read_to_string(path).map_err(|e| {
        Phase::Io.report(ErrorKind::Io {
            message: format!("failed to read {}: {e}", path.display()),
        })
    })
}
