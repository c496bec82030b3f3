//! Heuristic cross-check of extraction counts.
//!
//! Recounts each category straight from the source text with deliberately
//! simple rules that share nothing with either extractor except comment
//! masking. Disagreement is reported, never treated as an error.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::schema::{Records, TypeKind};
use crate::text::{mask_comments, NON_FUNCTION_KEYWORDS};

static DEFINE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*define\b").expect("valid regex"));

static TYPE_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(struct|enum)\s*(?:[A-Za-z_]\w*\s*)?\{").expect("valid regex")
});

/// `name(...)` followed by `{` or `;`, allowing one level of nested parens
static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*)\s*\((?:[^()]|\([^()]*\))*\)\s*[{;]").expect("valid regex")
});

/// Declaration category reported by the verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Macros,
    Types,
    Structs,
    Enums,
    Apis,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Macros => "macros",
            Self::Types => "types",
            Self::Structs => "structs",
            Self::Enums => "enums",
            Self::Apis => "apis",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Heuristic counts straight from the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicCounts {
    pub macros: usize,
    /// `structs + enums`
    pub types: usize,
    pub structs: usize,
    pub enums: usize,
    pub apis: usize,
}

/// One category's comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountCheck {
    pub category: Category,
    pub heuristic_count: usize,
    pub actual_count: usize,
    pub matches: bool,
}

impl CountCheck {
    fn new(category: Category, heuristic_count: usize, actual_count: usize) -> Self {
        Self {
            category,
            heuristic_count,
            actual_count,
            matches: heuristic_count == actual_count,
        }
    }
}

/// Comparisons in macros, types, structs, enums, apis order.
///
/// The struct and enum lines split the types line, so a struct/enum mix-up
/// that cancels out in the total still shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub checks: Vec<CountCheck>,
}

impl VerificationReport {
    pub fn check(&self, category: Category) -> Option<&CountCheck> {
        self.checks.iter().find(|c| c.category == category)
    }

    pub fn all_match(&self) -> bool {
        self.checks.iter().all(|c| c.matches)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &CountCheck> {
        self.checks.iter().filter(|c| !c.matches)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Verification ===")?;
        for check in &self.checks {
            let indent = match check.category {
                Category::Structs | Category::Enums => "  ",
                _ => "",
            };
            writeln!(
                f,
                "{}{:<7}: file~={:<4} json={:<4} {}",
                indent,
                check.category.name(),
                check.heuristic_count,
                check.actual_count,
                if check.matches { "ok" } else { "MISMATCH" }
            )?;
        }
        Ok(())
    }
}

/// Compare heuristic counts of `source` with the emitted records.
pub fn verify(source: &str, records: &Records) -> VerificationReport {
    let counts = heuristic_counts(source);
    let structs = records
        .types
        .iter()
        .filter(|t| t.kind == TypeKind::Struct)
        .count();
    let report = VerificationReport {
        checks: vec![
            CountCheck::new(Category::Macros, counts.macros, records.macros.len()),
            CountCheck::new(Category::Types, counts.types, records.types.len()),
            CountCheck::new(Category::Structs, counts.structs, structs),
            CountCheck::new(Category::Enums, counts.enums, records.types.len() - structs),
            CountCheck::new(Category::Apis, counts.apis, records.apis.len()),
        ],
    };

    for check in report.mismatches() {
        warn!(
            "{} count mismatch: heuristic {} vs extracted {}",
            check.category, check.heuristic_count, check.actual_count
        );
    }

    report
}

/// Count each category with the verifier's own heuristics.
pub fn heuristic_counts(source: &str) -> HeuristicCounts {
    let masked = mask_comments(source);
    let structs = count_type_definitions(&masked, TypeKind::Struct);
    let enums = count_type_definitions(&masked, TypeKind::Enum);
    HeuristicCounts {
        macros: count_defines(&masked),
        types: structs + enums,
        structs,
        enums,
        apis: count_signatures(&masked),
    }
}

/// Lines starting with `#define`
fn count_defines(masked: &str) -> usize {
    masked.lines().filter(|l| DEFINE_LINE_RE.is_match(l)).count()
}

/// `struct`/`enum` openings of `kind` whose brace is closed somewhere later
fn count_type_definitions(masked: &str, kind: TypeKind) -> usize {
    TYPE_OPEN_RE
        .captures_iter(masked)
        .filter(|caps| TypeKind::from_keyword(&caps[1]) == Some(kind))
        .filter_map(|caps| caps.get(0))
        .filter(|m| has_matching_close(masked, m.end() - 1))
        .count()
}

fn has_matching_close(text: &str, open: usize) -> bool {
    let mut depth = 0usize;
    for b in text.as_bytes()[open..].iter() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Signatures in the depth-0 text, minus keywords and initializers
fn count_signatures(masked: &str) -> usize {
    let flat = top_level_text(masked);
    SIGNATURE_RE
        .captures_iter(&flat)
        .filter(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if NON_FUNCTION_KEYWORDS.contains(&name) {
                return false;
            }
            let start = caps.get(0).map_or(0, |m| m.start());
            let statement_start = flat[..start]
                .rfind(|c: char| c == ';' || c == '}' || c == '{')
                .map_or(0, |i| i + 1);
            let prefix = &flat[statement_start..start];
            !prefix.contains('=') && !prefix.split_whitespace().any(|w| w == "typedef")
        })
        .count()
}

/// Blank preprocessor lines and the inside of every brace block, keeping
/// the braces themselves. `extern "C" {` wrappers do not nest.
fn top_level_text(masked: &str) -> String {
    let mut out = String::with_capacity(masked.len());
    let mut depth = 0usize;
    let mut linkage = 0usize;

    for line in masked.lines() {
        if line.trim_start().starts_with('#') {
            out.push('\n');
            continue;
        }
        for c in line.chars() {
            match c {
                '{' if depth == 0 && out.trim_end().ends_with("extern \"C\"") => {
                    linkage += 1;
                    out.push(' ');
                }
                '{' => {
                    if depth == 0 {
                        out.push('{');
                    }
                    depth += 1;
                }
                '}' if depth == 0 && linkage > 0 => {
                    linkage -= 1;
                    out.push(' ');
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        out.push('}');
                    }
                }
                _ if depth == 0 => out.push(c),
                _ => {}
            }
        }
        out.push('\n');
    }

    out
}
