//! Extract command implementation

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::{BackendChoice, Cli};
use crate::error::{ExtractError, Result};
use crate::extract::{extract_declarations, Backend, ExtractOptions};
use crate::output::{write_records, WrittenArtifacts};
use crate::schema::{Declarations, Records, TypeKind};
use crate::verify::{verify, VerificationReport};

/// Everything a run needs, decoupled from clap
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub backend: BackendChoice,
    pub print_ast: bool,
}

impl From<&Cli> for ExtractConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone(),
            output_dir: cli.output_dir.clone(),
            backend: cli.backend,
            print_ast: cli.print_ast,
        }
    }
}

/// Breakdown of the extracted declarations shown under the verification table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationStats {
    pub structs: usize,
    pub enums: usize,
    pub definitions: usize,
    pub prototypes: usize,
}

impl From<&Declarations> for DeclarationStats {
    fn from(declarations: &Declarations) -> Self {
        let structs = declarations
            .types
            .iter()
            .filter(|t| t.kind == TypeKind::Struct)
            .count();
        let definitions = declarations.functions.iter().filter(|f| f.has_body).count();
        Self {
            structs,
            enums: declarations.types.len() - structs,
            definitions,
            prototypes: declarations.functions.len() - definitions,
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub input: PathBuf,
    pub backend: Backend,
    pub records: Records,
    pub stats: DeclarationStats,
    pub artifacts: WrittenArtifacts,
    pub report: VerificationReport,
}

/// Run the extract command and return the console report
pub fn run_extract(cli: &Cli) -> Result<String> {
    let outcome = extract_file(&ExtractConfig::from(cli))?;
    Ok(render_report(&outcome))
}

/// Read, extract, format, write, verify.
pub fn extract_file(config: &ExtractConfig) -> Result<RunOutcome> {
    let source = read_source(&config.input)?;
    debug!("Read {} bytes from {}", source.len(), config.input.display());

    let backend = Backend::select(config.backend);
    info!("Using {} backend for {}", backend, config.input.display());

    let extraction = extract_declarations(
        &source,
        backend,
        ExtractOptions {
            print_ast: config.print_ast,
        },
    )?;

    let records = Records::from(&extraction.declarations);
    let stats = DeclarationStats::from(&extraction.declarations);
    let artifacts = write_records(&config.output_dir, &records)?;
    let report = verify(&source, &records);

    Ok(RunOutcome {
        input: config.input.clone(),
        backend: extraction.backend,
        records,
        stats,
        artifacts,
        report,
    })
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExtractError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ExtractError::InvalidInput {
            path: path.display().to_string(),
            message: e.to_string(),
        },
    })
}

/// Human-readable summary printed after the artifacts are written
pub fn render_report(outcome: &RunOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parsing file: {}", outcome.input.display());
    let _ = writeln!(out, "Parser method used: {}", outcome.backend);
    let _ = writeln!(out, "Wrote {}", outcome.artifacts.macros.display());
    let _ = writeln!(out, "Wrote {}", outcome.artifacts.types.display());
    let _ = writeln!(out, "Wrote {}", outcome.artifacts.apis.display());
    let _ = writeln!(out);
    out.push_str(&outcome.report.to_string());
    let _ = writeln!(
        out,
        "  types: {} structs, {} enums",
        outcome.stats.structs, outcome.stats.enums
    );
    let _ = writeln!(
        out,
        "  apis : {} definitions, {} prototypes",
        outcome.stats.definitions, outcome.stats.prototypes
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Note: file-side counts are heuristic approximations; mismatches are warnings only."
    );
    if outcome.backend == Backend::Regex {
        let _ = writeln!(
            out,
            "Regex extraction is approximate; the tree-sitter backend gives exact results."
        );
    }
    out
}
