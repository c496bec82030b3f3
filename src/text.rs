//! Text helpers shared by the extractors and the verifier
//!
//! Everything here works on raw C text and knows nothing about trees.

/// Replace every comment with spaces, keeping byte offsets and newlines intact.
///
/// String and character literals are left alone, so `"http://x"` survives.
/// Because offsets are preserved, a node range computed on the masked text
/// is also valid on the original.
pub fn mask_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str,
        Char,
        Line,
        Block,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    fn blank(out: &mut String, c: char) {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    }

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                '"' => {
                    out.push(c);
                    state = State::Str;
                }
                '\'' => {
                    out.push(c);
                    state = State::Char;
                }
                _ => out.push(c),
            },
            State::Str | State::Char => {
                out.push(c);
                let close = if state == State::Str { '"' } else { '\'' };
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == close || c == '\n' {
                    state = State::Code;
                }
            }
            State::Line => {
                if c == '\\' && chars.peek() == Some(&'\n') {
                    chars.next();
                    out.push_str(" \n");
                } else if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

/// Normalize whitespace: collapse multiple spaces/newlines to single space
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a type spelling so both extractors agree on it.
///
/// Whitespace is collapsed and `*` binds to the token before it:
/// `const char *` becomes `const char*`, `void * *` becomes `void**`.
pub fn normalize_type(s: &str) -> String {
    let mut out = normalize_whitespace(s);
    while out.contains(" *") {
        out = out.replace(" *", "*");
    }
    out
}

/// Drop backslash-newline continuations so a multi-line directive reads as one line.
pub fn join_continuations(s: &str) -> String {
    s.replace("\\\r\n", " ").replace("\\\n", " ")
}

/// Split a parameter list body on top-level commas.
///
/// Commas nested in parentheses, brackets or braces (function pointer
/// parameters, array sizes) do not split. An empty list or a lone `void`
/// yields no parameters.
pub fn split_params(params: &str) -> Vec<String> {
    let trimmed = params.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in trimmed.chars() {
        match c {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(normalize_whitespace(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(normalize_whitespace(&current));
    }

    parts
}

/// C keywords that can be followed by `(` but never name a function
pub const NON_FUNCTION_KEYWORDS: &[&str] = &[
    "if", "while", "for", "switch", "return", "sizeof", "_Alignof", "alignof", "_Generic",
    "_Static_assert", "static_assert", "__attribute__", "__declspec", "do", "else", "case",
    "typeof", "__typeof__", "__asm__", "asm",
];

/// Storage-class and function specifiers that are not part of a return type
pub const STORAGE_SPECIFIERS: &[&str] = &[
    "static", "extern", "inline", "__inline", "__inline__", "register", "auto", "_Noreturn",
    "_Thread_local", "thread_local",
];
