//! cdecl-extract: declaration extractor for C source files
//!
//! Pulls three kinds of declarations out of one C file and turns each into a
//! record with a generated description:
//!
//! - `#define` macros (`macros.json`)
//! - struct and enum definitions (`types.json`)
//! - function definitions and prototypes (`apis.json`)
//!
//! A function-like macro keeps its parameter list in `value`, so
//! `#define SQUARE(x) ((x) * (x))` is recorded with the value
//! `(x) ((x) * (x))` and the comment
//! `macro defined with name SQUARE and value (x) ((x) * (x))`.
//!
//! Extraction uses tree-sitter's C grammar when it can be loaded and a
//! conservative text scanner otherwise. A heuristic recount of the source
//! is compared against the results as a sanity check.
//!
//! # Example
//!
//! ```ignore
//! use cdecl_extract::{extract_declarations, Backend, ExtractOptions, Records};
//!
//! let source = "#define FOO 42\nint add(int a, int b);\n";
//! let extraction = extract_declarations(source, Backend::TreeSitter, ExtractOptions::default())?;
//! let records = Records::from(&extraction.declarations);
//!
//! assert_eq!(records.macros[0].comment, "macro defined with name FOO and value 42");
//! assert_eq!(records.apis[0].param_count, 2);
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod extract;
pub mod format;
pub mod fs_utils;
pub mod output;
pub mod parsing;
pub mod schema;
pub mod text;
pub mod verify;

// Re-export commonly used types
pub use cli::{BackendChoice, Cli};
pub use error::{ExtractError, Result};
pub use extract::{extract_declarations, Backend, ExtractOptions, Extraction, Extractor};
pub use output::write_records;
pub use schema::{
    ApiRecord, Declarations, MacroRecord, RawFunction, RawMacro, RawType, Records, TypeKind,
    TypeRecord,
};
pub use verify::{verify, Category, CountCheck, VerificationReport};
