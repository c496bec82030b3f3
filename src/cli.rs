//! CLI argument definitions using clap
//!
//! The only required argument is the C file. Every option also reads an
//! environment variable so the defaults can be changed without flags.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::output::DEFAULT_OUTPUT_DIR;

/// Extract macros, types and function APIs from a C source file
#[derive(Parser, Debug)]
#[command(name = "cdecl-extract")]
#[command(about = "Extracts macros, struct/enum types and function APIs from a C file into JSON")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// C source file to analyze
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory receiving macros.json, types.json and apis.json
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "CDECL_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    pub output_dir: PathBuf,

    /// Extraction backend
    #[arg(long, value_enum, env = "CDECL_BACKEND", default_value = "auto")]
    pub backend: BackendChoice,

    /// Print the tree-sitter AST to stderr
    #[arg(long)]
    pub print_ast: bool,

    /// Show verbose (debug) logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Requested extraction backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendChoice {
    /// tree-sitter when the grammar loads, regex scanning otherwise
    #[default]
    Auto,
    /// Ask for tree-sitter (still falls back if it cannot run)
    TreeSitter,
    /// Regex scanning only
    Regex,
}
