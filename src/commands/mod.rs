//! Command implementation for the cdecl-extract CLI
//!
//! `extract` runs the whole pipeline for one file: read, extract, format,
//! write the artifacts, verify, and render the console report.

pub mod extract;

pub use extract::{
    extract_file, render_report, run_extract, DeclarationStats, ExtractConfig, RunOutcome,
};
