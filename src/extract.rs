//! Declaration extraction orchestration
//!
//! Two extractors share the [`Extractor`] interface: the precise one walks a
//! tree-sitter syntax tree, the fallback one scans text. [`Backend::select`]
//! picks one once per run, and [`extract_declarations`] drops to the fallback
//! when the precise extractor cannot produce a usable tree.

pub mod fallback;
pub mod syntax;

use std::fmt;

use tracing::{debug, info, warn};

use crate::cli::BackendChoice;
use crate::error::Result;
use crate::parsing;
use crate::schema::Declarations;

pub use fallback::FallbackExtractor;
pub use syntax::SyntaxExtractor;

/// Something that turns C source text into raw declarations
pub trait Extractor {
    /// Backend this extractor implements
    fn backend(&self) -> Backend;

    /// Extract macros, types and functions in declaration order
    fn extract(&self, source: &str) -> Result<Declarations>;
}

/// Which extraction strategy served a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// tree-sitter C grammar
    TreeSitter,
    /// Conservative text scanner
    Regex,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TreeSitter => "tree-sitter",
            Self::Regex => "regex",
        }
    }

    /// Resolve the requested backend against what this host can actually run.
    ///
    /// Asking for tree-sitter on a host where the grammar cannot be loaded
    /// still yields the regex backend; extraction never aborts over it.
    pub fn select(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Regex => {
                info!("regex backend requested, skipping tree-sitter");
                Self::Regex
            }
            BackendChoice::Auto | BackendChoice::TreeSitter => match parsing::c_parser() {
                Ok(_) => Self::TreeSitter,
                Err(e) => {
                    warn!("{}; falling back to regex extraction", e);
                    Self::Regex
                }
            },
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs for a single extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Dump the tree-sitter S-expression to stderr
    pub print_ast: bool,
}

/// Declarations plus the backend that actually produced them
#[derive(Debug, Clone)]
pub struct Extraction {
    pub declarations: Declarations,
    pub backend: Backend,
}

/// Extract declarations with `backend`, falling back to the text scanner if
/// the precise extractor reports a recoverable failure.
pub fn extract_declarations(
    source: &str,
    backend: Backend,
    options: ExtractOptions,
) -> Result<Extraction> {
    match backend {
        Backend::TreeSitter => match run(&SyntaxExtractor::new(options.print_ast), source) {
            Err(e) if e.is_recoverable() => {
                warn!("tree-sitter extraction failed ({}); falling back to regex extraction", e);
                run(&FallbackExtractor, source)
            }
            result => result,
        },
        Backend::Regex => run(&FallbackExtractor, source),
    }
}

/// Run one extractor and tag the result with its backend
fn run(extractor: &dyn Extractor, source: &str) -> Result<Extraction> {
    let declarations = extractor.extract(source)?;
    let backend = extractor.backend();
    debug!(
        "{} backend found {} macros, {} types, {} functions",
        backend,
        declarations.macros.len(),
        declarations.types.len(),
        declarations.functions.len()
    );
    Ok(Extraction {
        declarations,
        backend,
    })
}
