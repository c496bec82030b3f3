//! tree-sitter front end for the precise extractor.
//!
//! Loading the C grammar into a parser doubles as the availability check for
//! the precise backend: if the grammar's ABI does not match the linked
//! tree-sitter runtime, `set_language` fails and the run falls back to the
//! text scanner.
//!
//! # Example
//!
//! ```ignore
//! use cdecl_extract::parsing::parse_c;
//!
//! let tree = parse_c("int add(int a, int b);", false)?;
//! assert_eq!(tree.root_node().kind(), "translation_unit");
//! ```

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{ExtractError, Result};

/// Share of non-whitespace source bytes that top-level `ERROR` nodes may
/// cover before a parse counts as failed.
pub const MAX_ERROR_RATIO: f64 = 0.5;

/// The tree-sitter C grammar
pub fn c_language() -> Language {
    tree_sitter_c::LANGUAGE.into()
}

/// Create a parser with the C grammar loaded.
///
/// # Errors
///
/// Returns `ExtractError::BackendUnavailable` if the grammar cannot be loaded.
pub fn c_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&c_language())
        .map_err(|e| ExtractError::BackendUnavailable {
            message: format!("Failed to load the C grammar: {:?}", e),
        })?;
    Ok(parser)
}

/// Parse C source into a syntax tree.
///
/// tree-sitter recovers from most syntax errors on its own; the parse only
/// counts as failed when recovery clearly did not work (see [`check_parse`]).
///
/// # Arguments
///
/// * `source` - The source code to parse
/// * `print_ast` - If true, prints the AST to stderr for debugging
///
/// # Errors
///
/// Returns `ExtractError::BackendUnavailable` if the grammar cannot be loaded
/// and `ExtractError::ParseFailure` if no usable tree comes back.
pub fn parse_c(source: &str, print_ast: bool) -> Result<Tree> {
    let mut parser = c_parser()?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::ParseFailure {
            message: "tree-sitter returned no tree".to_string(),
        })?;

    if print_ast {
        eprintln!("=== AST ===");
        eprintln!("{}", tree.root_node().to_sexp());
        eprintln!("===========");
    }

    check_parse(&tree, source)?;
    Ok(tree)
}

/// Reject trees that are mostly error recovery.
pub fn check_parse(tree: &Tree, source: &str) -> Result<()> {
    let root = tree.root_node();
    if root.is_error() {
        return Err(ExtractError::ParseFailure {
            message: "the whole translation unit is a syntax error".to_string(),
        });
    }

    let total = non_whitespace_bytes(source);
    if total == 0 {
        return Ok(());
    }

    let mut cursor = root.walk();
    let broken: usize = root
        .children(&mut cursor)
        .filter(|child| child.is_error())
        .map(|child| non_whitespace_bytes(node_slice(&child, source)))
        .sum();

    let ratio = broken as f64 / total as f64;
    if ratio > MAX_ERROR_RATIO {
        return Err(ExtractError::ParseFailure {
            message: format!(
                "{:.0}% of the source failed to parse",
                ratio * 100.0
            ),
        });
    }

    Ok(())
}

fn node_slice<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

fn non_whitespace_bytes(s: &str) -> usize {
    s.bytes().filter(|b| !b.is_ascii_whitespace()).count()
}
