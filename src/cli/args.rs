//! Defines the command-line arguments and subcommands for the Sprig CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sprig",
    version,
    about = "A small Lisp with user macros, quasiquotation and proper tail calls."
)]
pub struct SprigArgs {
    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum nesting of non-tail evaluation (overrides the config file).
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Defaults to `repl` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive prompt.
    Repl,
    /// Evaluate files in order. Directories are searched for `*.scm` files.
    Run {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the canonical form of every top-level form in a file.
    Expand {
        #[arg(required = true)]
        file: PathBuf,
        /// Also show each macro invocation before and after rewriting.
        #[arg(long)]
        trace: bool,
    },
    /// List the built-in primitives.
    ListAtoms,
}
