//! Fallback extractor: conservative text scanning, no parser required.
//!
//! Less accurate than the tree-sitter path by construction. Known blind spots:
//! code switched off by `#if 0` is still scanned, macros that expand to
//! declarations are invisible, and a declaration with several function
//! declarators (`int a(void), b(int);`) is skipped entirely.
//!
//! The scan runs in two passes over comment-masked text:
//!
//! 1. Preprocessor lines (continuations joined) yield the macros and are then
//!    blanked out.
//! 2. The rest is cut into top-level statements by a brace-depth scanner.
//!    A brace block ends its statement right away when the text before it
//!    ends in `)` (a function body); otherwise the statement runs to the next
//!    top-level `;`. Each statement is then classified as a type definition,
//!    a function, or ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{Backend, Extractor};
use crate::error::Result;
use crate::schema::{Declarations, RawFunction, RawMacro, RawType, TypeKind};
use crate::text::{
    mask_comments, normalize_type, normalize_whitespace, split_params, NON_FUNCTION_KEYWORDS,
    STORAGE_SPECIFIERS,
};

static DEFINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#\s*define\s+([A-Za-z_]\w*)(.*)$").expect("valid regex"));

static TYPE_HEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(typedef\s+)?(?:(?:static|extern|const|volatile)\s+)*(struct|enum)(?:\s+([A-Za-z_]\w*))?$",
    )
    .expect("valid regex")
});

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_]\w*").expect("valid regex"));

/// Text-pattern extractor used when tree-sitter is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExtractor;

impl Extractor for FallbackExtractor {
    fn backend(&self) -> Backend {
        Backend::Regex
    }

    fn extract(&self, source: &str) -> Result<Declarations> {
        Ok(scan(source))
    }
}

/// Run both passes over `source`. Never fails; anything it cannot make sense
/// of is skipped.
pub fn scan(source: &str) -> Declarations {
    let masked = mask_comments(source);
    let (macros, code) = split_preprocessor(&masked);

    let mut declarations = Declarations {
        macros,
        ..Default::default()
    };
    for statement in top_level_statements(&code) {
        classify(&statement, &mut declarations);
    }
    declarations
}

// ============================================================================
// Pass 1: preprocessor
// ============================================================================

/// Pull `#define`s out of the text and blank every directive line.
///
/// Returns the macros and the remaining code with the same line count.
fn split_preprocessor(masked: &str) -> (Vec<RawMacro>, String) {
    let mut macros = Vec::new();
    let mut code = String::with_capacity(masked.len());
    let mut lines = masked.lines();

    while let Some(line) = lines.next() {
        if !line.trim_start().starts_with('#') {
            code.push_str(line);
            code.push('\n');
            continue;
        }

        let mut logical = String::new();
        let mut current = line;
        loop {
            code.push('\n');
            match current.trim_end().strip_suffix('\\') {
                Some(head) => {
                    logical.push_str(head);
                    logical.push(' ');
                    match lines.next() {
                        Some(next) => current = next,
                        None => break,
                    }
                }
                None => {
                    logical.push_str(current);
                    break;
                }
            }
        }

        if let Some(caps) = DEFINE_RE.captures(&logical) {
            macros.push(RawMacro {
                name: caps[1].to_string(),
                value: normalize_whitespace(&caps[2]),
            });
        } else if logical.trim_start()[1..].trim_start().starts_with("define") {
            debug!("skipping malformed #define: {}", logical.trim());
        }
    }

    (macros, code)
}

// ============================================================================
// Pass 2: top-level statements
// ============================================================================

/// One top-level statement: `head { body } tail ;`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Statement {
    head: String,
    body: Option<String>,
    tail: String,
    line: usize,
}

#[derive(Debug, Default)]
struct Scanner {
    statements: Vec<Statement>,
    current: Statement,
    block: String,
    depth: usize,
    /// The open block belongs to the tail (`= { ... }` after a type body)
    block_in_tail: bool,
    /// Open `extern "C" {` wrappers
    linkage_blocks: usize,
    line: usize,
    literal: Option<char>,
    escaped: bool,
}

impl Scanner {
    fn buffer(&mut self) -> &mut String {
        if self.depth > 0 {
            &mut self.block
        } else if self.current.body.is_some() {
            &mut self.current.tail
        } else {
            &mut self.current.head
        }
    }

    fn push(&mut self, c: char) {
        if self.depth == 0
            && self.current.body.is_none()
            && self.current.head.trim().is_empty()
            && !c.is_whitespace()
        {
            self.current.line = self.line;
        }
        self.buffer().push(c);
    }

    fn emit(&mut self) {
        let statement = std::mem::take(&mut self.current);
        if !statement.head.trim().is_empty() {
            self.statements.push(statement);
        }
    }

    fn reset(&mut self) {
        self.current = Statement::default();
    }

    fn open_brace(&mut self) {
        if self.depth > 0 {
            self.depth += 1;
            self.block.push('{');
            return;
        }

        if self.current.body.is_none() && is_linkage_spec(&self.current.head) {
            self.linkage_blocks += 1;
            self.reset();
            return;
        }

        self.block_in_tail = self.current.body.is_some();
        self.block.clear();
        self.depth = 1;
    }

    fn close_brace(&mut self) {
        match self.depth {
            0 => {
                if self.linkage_blocks > 0 {
                    self.linkage_blocks -= 1;
                } else {
                    debug!("skipping stray '}}' at line {}", self.line);
                }
                self.reset();
            }
            1 => {
                self.depth = 0;
                let block = std::mem::take(&mut self.block);
                if self.block_in_tail {
                    self.current.tail.push('{');
                    self.current.tail.push_str(&block);
                    self.current.tail.push('}');
                } else {
                    self.current.body = Some(block);
                    if self.current.head.trim_end().ends_with(')') {
                        self.emit();
                    }
                }
            }
            _ => {
                self.depth -= 1;
                self.block.push('}');
            }
        }
    }

    fn feed(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
        }

        if let Some(close) = self.literal {
            self.buffer().push(c);
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == close || c == '\n' {
                self.literal = None;
            }
            return;
        }

        match c {
            '"' | '\'' => {
                self.literal = Some(c);
                self.push(c);
            }
            '{' => self.open_brace(),
            '}' => self.close_brace(),
            ';' if self.depth == 0 => self.emit(),
            _ => self.push(c),
        }
    }

    fn finish(self) -> Vec<Statement> {
        if self.depth > 0 {
            debug!(
                "dropping unterminated block starting at line {}",
                self.current.line
            );
        }
        self.statements
    }
}

fn is_linkage_spec(head: &str) -> bool {
    matches!(normalize_whitespace(head).as_str(), "extern \"C\"" | "extern \"C++\"")
}

fn top_level_statements(code: &str) -> Vec<Statement> {
    let mut scanner = Scanner {
        line: 1,
        ..Default::default()
    };
    for c in code.chars() {
        scanner.feed(c);
    }
    scanner.finish()
}

// ============================================================================
// Classification
// ============================================================================

fn classify(statement: &Statement, out: &mut Declarations) {
    let head = normalize_whitespace(&statement.head);

    if let Some(body) = &statement.body {
        if let Some(caps) = TYPE_HEAD_RE.captures(&head) {
            let kind = TypeKind::from_keyword(&caps[2]).unwrap_or(TypeKind::Struct);
            let alias = caps.get(1).and_then(|_| first_identifier(&statement.tail));
            let tag = caps.get(3).map(|m| m.as_str().to_string());

            match alias.or(tag) {
                Some(name) => out.types.push(RawType {
                    name,
                    kind,
                    member_count: match kind {
                        TypeKind::Struct => count_struct_members(body),
                        TypeKind::Enum => count_enum_members(body),
                    },
                }),
                None => debug!("skipping anonymous {} at line {}", kind, statement.line),
            }
            return;
        }
    }

    let looks_like_signature = head.ends_with(')')
        && (statement.body.is_some() || statement.tail.trim().is_empty());
    if !looks_like_signature {
        return;
    }

    match parse_signature(&head) {
        Some((return_type, name, params)) => out.functions.push(RawFunction {
            name,
            param_count: split_params(&params).len(),
            return_type,
            has_body: statement.body.is_some(),
        }),
        None => debug!("skipping non-function statement at line {}", statement.line),
    }
}

/// Typedef alias from the text after a type body (`} *NodePtr, Node;` -> `NodePtr`)
fn first_identifier(tail: &str) -> Option<String> {
    let cleaned = strip_attributes(tail);
    IDENT_RE.find(&cleaned).map(|m| m.as_str().to_string())
}

/// Remove every `__attribute__((...))`, nested parentheses included.
fn strip_attributes(text: &str) -> String {
    const KEYWORD: &str = "__attribute__";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find(KEYWORD) {
        out.push_str(&rest[..at]);
        let after = &rest[at + KEYWORD.len()..];
        let args = after.trim_start();
        let skipped = after.len() - args.len();
        match args.starts_with('(').then(|| matching_paren(args, 0)).flatten() {
            Some(close) => {
                out.push(' ');
                rest = &after[skipped + close + 1..];
            }
            // Unbalanced: keep the text as is.
            None => {
                out.push_str(&rest[at..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Split `body` on `sep` at nesting depth 0, outside string and char literals.
fn split_top_level(body: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut literal: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if let Some(close) = literal {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == close || c == '\n' {
                literal = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => literal = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&body[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Members of a struct body: one per top-level declarator.
///
/// Each top-level `;` ends a member declaration; top-level commas inside it
/// add declarators (`int x, y;`). Commas nested in braces or parentheses
/// (inner struct bodies, function pointer parameters) do not count.
fn count_struct_members(body: &str) -> usize {
    let mut segments = split_top_level(body, ';');
    // Text after the last ';' is not a terminated declaration.
    segments.pop();
    segments
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| split_top_level(s, ',').len())
        .sum()
}

/// Enumerators: non-empty comma-separated entries (trailing comma allowed)
fn count_enum_members(body: &str) -> usize {
    split_top_level(body, ',')
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Split `RETURN_TYPE NAME(PARAMS)` into its parts.
///
/// Attributes and a leading `extern "C"` are dropped first. Rejects anything
/// where the text before the name is empty or only storage classes (macro
/// invocations, implicit int), where the name is a keyword, or where anything
/// follows the parameter list.
fn parse_signature(head: &str) -> Option<(String, String, String)> {
    let cleaned = normalize_whitespace(&strip_attributes(head));
    let head = strip_linkage(&cleaned);
    let open = head.find('(')?;
    let before = head[..open].trim_end();

    let name_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)?;
    let name = &before[name_start..];
    if name.starts_with(|c: char| c.is_ascii_digit()) || NON_FUNCTION_KEYWORDS.contains(&name) {
        return None;
    }

    let raw_return = before[..name_start].trim();
    if raw_return.is_empty()
        || raw_return.contains(|c: char| "=(){}[],;\"'".contains(c))
        || raw_return.split_whitespace().any(|w| w == "typedef")
    {
        return None;
    }

    let kept: Vec<&str> = raw_return
        .split_whitespace()
        .filter(|w| !STORAGE_SPECIFIERS.contains(w))
        .collect();
    if kept.is_empty() || kept.iter().all(|w| *w == "*") {
        return None;
    }
    let return_type = normalize_type(&kept.join(" "));

    let close = matching_paren(head, open)?;
    if !head[close + 1..].trim().is_empty() {
        return None;
    }

    Some((
        return_type,
        name.to_string(),
        head[open + 1..close].to_string(),
    ))
}

/// `extern "C" int f(void)` -> `int f(void)`
fn strip_linkage(head: &str) -> &str {
    ["extern \"C\" ", "extern \"C++\" "]
        .iter()
        .find_map(|prefix| head.strip_prefix(prefix))
        .unwrap_or(head)
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
