//! Declaration data structures
//!
//! Two layers live here: the raw declarations produced by either extractor,
//! and the serialized records produced from them by [`crate::format`].
//! Record field order is the JSON field order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a type definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Enum,
}

impl TypeKind {
    /// C keyword introducing this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Enum => "enum",
        }
    }

    /// Parse a `struct` / `enum` keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Raw declarations
// ============================================================================

/// A `#define` as found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMacro {
    pub name: String,
    /// Replacement text, whitespace collapsed; empty for flag macros
    pub value: String,
}

/// A struct or enum definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawType {
    pub name: String,
    pub kind: TypeKind,
    pub member_count: usize,
}

/// A function definition or prototype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFunction {
    pub name: String,
    pub param_count: usize,
    pub return_type: String,
    /// Definition (true) or prototype (false)
    pub has_body: bool,
}

/// Everything one extractor found in one file, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub macros: Vec<RawMacro>,
    pub types: Vec<RawType>,
    pub functions: Vec<RawFunction>,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty() && self.types.is_empty() && self.functions.is_empty()
    }
}

// ============================================================================
// Records
// ============================================================================

/// One entry of `macros.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRecord {
    pub name: String,
    pub value: String,
    pub comment: String,
}

/// One entry of `types.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub kind: TypeKind,
    pub member_count: usize,
    pub comment: String,
}

/// One entry of `apis.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRecord {
    pub name: String,
    pub param_count: usize,
    pub return_type: String,
    pub comment: String,
}

/// The three record collections of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    pub macros: Vec<MacroRecord>,
    pub types: Vec<TypeRecord>,
    pub apis: Vec<ApiRecord>,
}
