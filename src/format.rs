//! Record formatting
//!
//! Maps raw declarations to records and fills in their comments. Each record
//! kind owns one [`CommentTemplate`]; the comment is always rendered from the
//! record's other fields, so regenerating it reproduces the stored text.

use crate::schema::{
    ApiRecord, Declarations, MacroRecord, RawFunction, RawMacro, RawType, Records, TypeRecord,
};

/// Record kinds with a comment template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Macro,
    Type,
    Api,
}

/// A comment format string and the record fields it consumes, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentTemplate {
    pub kind: RecordKind,
    pub format: &'static str,
    pub fields: &'static [&'static str],
}

pub const TEMPLATES: [CommentTemplate; 3] = [
    CommentTemplate {
        kind: RecordKind::Macro,
        format: "macro defined with name {name} and value {value}",
        fields: &["name", "value"],
    },
    CommentTemplate {
        kind: RecordKind::Type,
        format: "defined with name {name} and have {member_count} members",
        fields: &["name", "member_count"],
    },
    CommentTemplate {
        kind: RecordKind::Api,
        format: "Function with name {name} having {param_count} arguments with return type {return_type}",
        fields: &["name", "param_count", "return_type"],
    },
];

impl CommentTemplate {
    pub fn for_kind(kind: RecordKind) -> &'static CommentTemplate {
        match kind {
            RecordKind::Macro => &TEMPLATES[0],
            RecordKind::Type => &TEMPLATES[1],
            RecordKind::Api => &TEMPLATES[2],
        }
    }

    /// Fill the placeholders with `values`, given in `fields` order.
    ///
    /// Single pass over the format string: a value that happens to contain
    /// `{name}` is inserted verbatim, never expanded again.
    pub fn render(&self, values: &[&str]) -> String {
        debug_assert_eq!(values.len(), self.fields.len());

        let mut out = String::with_capacity(self.format.len() + 32);
        let mut rest = self.format;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let field = &after[..close];
            match self.fields.iter().position(|f| *f == field) {
                Some(i) => out.push_str(values.get(i).copied().unwrap_or("")),
                None => {
                    out.push('{');
                    out.push_str(field);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

pub fn macro_comment(name: &str, value: &str) -> String {
    CommentTemplate::for_kind(RecordKind::Macro).render(&[name, value])
}

pub fn type_comment(name: &str, member_count: usize) -> String {
    CommentTemplate::for_kind(RecordKind::Type).render(&[name, &member_count.to_string()])
}

pub fn api_comment(name: &str, param_count: usize, return_type: &str) -> String {
    CommentTemplate::for_kind(RecordKind::Api).render(&[
        name,
        &param_count.to_string(),
        return_type,
    ])
}

pub fn format_macro(raw: &RawMacro) -> MacroRecord {
    MacroRecord {
        name: raw.name.clone(),
        value: raw.value.clone(),
        comment: macro_comment(&raw.name, &raw.value),
    }
}

pub fn format_type(raw: &RawType) -> TypeRecord {
    TypeRecord {
        name: raw.name.clone(),
        kind: raw.kind,
        member_count: raw.member_count,
        comment: type_comment(&raw.name, raw.member_count),
    }
}

pub fn format_function(raw: &RawFunction) -> ApiRecord {
    ApiRecord {
        name: raw.name.clone(),
        param_count: raw.param_count,
        return_type: raw.return_type.clone(),
        comment: api_comment(&raw.name, raw.param_count, &raw.return_type),
    }
}

impl From<&Declarations> for Records {
    fn from(declarations: &Declarations) -> Self {
        Self {
            macros: declarations.macros.iter().map(format_macro).collect(),
            types: declarations.types.iter().map(format_type).collect(),
            apis: declarations.functions.iter().map(format_function).collect(),
        }
    }
}
