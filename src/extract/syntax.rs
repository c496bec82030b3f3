//! Precise extractor backed by the tree-sitter C grammar

use tracing::debug;
use tree_sitter::{Node, Tree};

use super::{Backend, Extractor};
use crate::error::Result;
use crate::parsing::parse_c;
use crate::schema::{Declarations, RawFunction, RawMacro, RawType, TypeKind};
use crate::text::{join_continuations, mask_comments, normalize_type, normalize_whitespace};

/// Node kinds whose children still count as top level
const TRANSPARENT_KINDS: &[&str] = &[
    "preproc_if",
    "preproc_ifdef",
    "preproc_elif",
    "preproc_elifdef",
    "preproc_else",
    "linkage_specification",
    "declaration_list",
];

/// Walks the syntax tree of one translation unit
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxExtractor {
    print_ast: bool,
}

impl SyntaxExtractor {
    pub fn new(print_ast: bool) -> Self {
        Self { print_ast }
    }
}

impl Extractor for SyntaxExtractor {
    fn backend(&self) -> Backend {
        Backend::TreeSitter
    }

    fn extract(&self, source: &str) -> Result<Declarations> {
        // Parse the masked text so every slice we take is comment-free.
        let masked = mask_comments(source);
        let tree = parse_c(&masked, self.print_ast)?;
        Ok(collect_declarations(&tree, &masked))
    }
}

/// Collect the top-level declarations of a parsed tree
pub fn collect_declarations(tree: &Tree, source: &str) -> Declarations {
    let mut declarations = Declarations::default();
    visit_top_level(&tree.root_node(), source, &mut declarations);
    declarations
}

/// Get text content of a node
fn get_node_text(node: &Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

fn visit_top_level(node: &Node, source: &str, out: &mut Declarations) {
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "preproc_def" | "preproc_function_def" => {
                if let Some(m) = extract_macro(&child, source) {
                    out.macros.push(m);
                }
            }
            "struct_specifier" | "enum_specifier" => {
                if let Some(t) = extract_type(&child, None, source) {
                    out.types.push(t);
                }
            }
            "type_definition" => extract_type_definition(&child, source, out),
            "declaration" => extract_declaration(&child, source, out),
            "function_definition" => {
                if let Some(declarator) = child.child_by_field_name("declarator") {
                    if let Some(f) = function_from_declarator(&child, declarator, source, true) {
                        out.functions.push(f);
                    }
                }
            }
            "ERROR" => {
                debug!("skipping unparseable region at line {}", line_of(&child));
            }
            kind if TRANSPARENT_KINDS.contains(&kind) => visit_top_level(&child, source, out),
            _ => {}
        }
    }
}

// ============================================================================
// Macros
// ============================================================================

fn extract_macro(node: &Node, source: &str) -> Option<RawMacro> {
    let name_node = node.child_by_field_name("name")?;
    let name = get_node_text(&name_node, source);
    if name.is_empty() {
        return None;
    }

    // Everything after the name: parameter list (function-like) and body.
    let rest = source.get(name_node.end_byte()..node.end_byte()).unwrap_or("");
    let value = normalize_whitespace(&join_continuations(rest));

    Some(RawMacro { name, value })
}

// ============================================================================
// Types
// ============================================================================

/// A struct/enum specifier with a body. `alias` names it when it sits
/// inside a typedef.
fn extract_type(node: &Node, alias: Option<String>, source: &str) -> Option<RawType> {
    let kind = match node.kind() {
        "struct_specifier" => TypeKind::Struct,
        "enum_specifier" => TypeKind::Enum,
        _ => return None,
    };

    // Forward declarations and plain references have no body.
    let body = node.child_by_field_name("body")?;

    let tag = node
        .child_by_field_name("name")
        .map(|n| get_node_text(&n, source));
    let Some(name) = alias.or(tag).filter(|n| !n.is_empty()) else {
        debug!("skipping anonymous {} at line {}", kind, line_of(node));
        return None;
    };

    let member_count = match kind {
        TypeKind::Struct => count_fields(&body),
        TypeKind::Enum => count_enumerators(&body),
    };

    Some(RawType {
        name,
        kind,
        member_count,
    })
}

fn count_fields(body: &Node) -> usize {
    let mut count = 0;
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "field_declaration" => {
                let mut decl_cursor = child.walk();
                let declarators = child
                    .children_by_field_name("declarator", &mut decl_cursor)
                    .count();
                // An anonymous nested struct/union is still one member.
                count += declarators.max(1);
            }
            kind if TRANSPARENT_KINDS.contains(&kind) => count += count_fields(&child),
            _ => {}
        }
    }
    count
}

fn count_enumerators(body: &Node) -> usize {
    let mut count = 0;
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "enumerator" => count += 1,
            kind if TRANSPARENT_KINDS.contains(&kind) => count += count_enumerators(&child),
            _ => {}
        }
    }
    count
}

fn extract_type_definition(node: &Node, source: &str, out: &mut Declarations) {
    let Some(ty) = node.child_by_field_name("type") else {
        return;
    };
    let alias = node
        .child_by_field_name("declarator")
        .and_then(|d| declarator_identifier(&d, source));

    if let Some(t) = extract_type(&ty, alias, source) {
        out.types.push(t);
    }
}

/// Innermost identifier of a typedef declarator (`*PointPtr` -> `PointPtr`)
fn declarator_identifier(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" | "identifier" => Some(get_node_text(node, source)),
        "pointer_declarator" | "array_declarator" | "function_declarator" => node
            .child_by_field_name("declarator")
            .and_then(|d| declarator_identifier(&d, source)),
        "parenthesized_declarator" => node
            .named_child(0)
            .and_then(|d| declarator_identifier(&d, source)),
        _ => None,
    }
}

// ============================================================================
// Functions
// ============================================================================

/// A top-level `declaration` can define a type (`struct P {..} p;`) and
/// declare any number of functions (`int a(void), b(int);`).
fn extract_declaration(node: &Node, source: &str, out: &mut Declarations) {
    if let Some(ty) = node.child_by_field_name("type") {
        if let Some(t) = extract_type(&ty, None, source) {
            out.types.push(t);
        }
    }

    let mut cursor = node.walk();
    let declarators: Vec<Node> = node
        .children_by_field_name("declarator", &mut cursor)
        .collect();
    for declarator in declarators {
        if let Some(f) = function_from_declarator(node, declarator, source, false) {
            out.functions.push(f);
        }
    }
}

/// Unwrap pointer declarators down to a function declarator and describe it.
///
/// Returns `None` for anything that is not a plain named function, which
/// includes function pointer variables (`int (*fp)(int)`).
fn function_from_declarator(
    decl: &Node,
    declarator: Node,
    source: &str,
    has_body: bool,
) -> Option<RawFunction> {
    let mut pointer_depth = 0;
    let mut current = declarator;
    while current.kind() == "pointer_declarator" {
        pointer_depth += 1;
        current = current.child_by_field_name("declarator")?;
    }
    if current.kind() != "function_declarator" {
        return None;
    }

    let name_node = current.child_by_field_name("declarator")?;
    if name_node.kind() != "identifier" {
        return None;
    }
    let name = get_node_text(&name_node, source);
    if name.is_empty() {
        return None;
    }

    let param_count = current
        .child_by_field_name("parameters")
        .map(|p| count_parameters(&p, source))
        .unwrap_or(0);

    Some(RawFunction {
        name,
        param_count,
        return_type: return_type(decl, pointer_depth, source),
        has_body,
    })
}

fn count_parameters(list: &Node, source: &str) -> usize {
    let mut cursor = list.walk();
    let params: Vec<Node> = list
        .children(&mut cursor)
        .filter(|c| {
            matches!(
                c.kind(),
                "parameter_declaration" | "variadic_parameter" | "..." | "identifier"
            )
        })
        .collect();

    // `(void)` declares no parameters.
    if params.len() == 1 && normalize_whitespace(&get_node_text(&params[0], source)) == "void" {
        return 0;
    }
    params.len()
}

/// Qualifiers and type specifier in source order, plus one `*` per pointer
/// level around the function declarator. Storage classes are left out.
fn return_type(decl: &Node, pointer_depth: usize, source: &str) -> String {
    let type_id = decl.child_by_field_name("type").map(|t| t.id());

    let mut parts = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        if child.kind() == "type_qualifier" || Some(child.id()) == type_id {
            parts.push(get_node_text(&child, source));
        }
    }

    let mut spelled = parts.join(" ");
    spelled.push_str(&"*".repeat(pointer_depth));
    normalize_type(&spelled)
}
