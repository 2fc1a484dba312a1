//! Invocation scanner (C5): locating `name(...)` call sites of known macros
//! in a text, respecting string/character literal boundaries.

use crate::error::{Result, SupDefError};
use std::path::Path;

/// A raw invocation located by [`find_next_invocation`]: spans in byte
/// offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInvocation {
    /// Registered macro name.
    pub name: String,
    /// Byte offset of the first character of `name`.
    pub start: usize,
    /// Byte offset one past the closing `)`.
    pub end: usize,
    /// Byte offset of the first character inside the parentheses.
    pub arg_start: usize,
    /// Byte offset one past the last character inside the parentheses
    /// (i.e. the offset of the closing `)`).
    pub arg_end: usize,
}

impl RawInvocation {
    /// The full `name(...)` text, including both parentheses.
    pub fn full_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// The text strictly between the outer parentheses.
    pub fn arg_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.arg_start..self.arg_end]
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find the first invocation of a known macro at or after byte offset
/// `start` in `text`. `is_known` decides whether an accumulated identifier
/// names a registered macro.
pub fn find_next_invocation(
    path: &Path,
    text: &str,
    start: usize,
    is_known: impl Fn(&str) -> bool,
) -> Result<Option<RawInvocation>> {
    let bytes_len = text.len();
    let mut in_string = false;
    let mut in_char = false;
    let mut ident: Option<(usize, String)> = None;

    let mut idx = start;
    let mut chars = text[start..].char_indices().peekable();

    let ident_start_byte;
    let ident_name;

    loop {
        let Some(&(rel, c)) = chars.peek() else {
            return Ok(None);
        };
        let abs = start + rel;
        idx = abs;

        if in_string || in_char {
            // Backslashes were already validated by the lexical normaliser;
            // inside a literal they simply consume the following character.
            match c {
                '\\' => {
                    chars.next();
                    chars.next();
                    continue;
                }
                '"' if !in_char => {
                    in_string = false;
                    chars.next();
                    continue;
                }
                '\'' if !in_string => {
                    in_char = false;
                    chars.next();
                    continue;
                }
                _ => {
                    chars.next();
                    continue;
                }
            }
        }

        if c.is_whitespace() {
            if ident.is_none() {
                chars.next();
                continue;
            }
        }

        let is_ident_char = match &ident {
            None => is_identifier_start(c),
            Some(_) => is_identifier_continue(c),
        };

        if is_ident_char {
            match &mut ident {
                Some((_, buf)) => buf.push(c),
                None => ident = Some((abs, c.to_string())),
            }
            chars.next();
            continue;
        }

        // Identifier just broke on a non-identifier character.
        if let Some((ident_abs, name)) = ident.take() {
            if is_known(&name) {
                ident_start_byte = ident_abs;
                ident_name = name;
                idx = abs;
                break;
            }
            // Not known: discard and fall through to re-examine `c` below.
        }

        match c {
            '\\' => {
                return Err(SupDefError::StrayBackslash {
                    path: path.to_path_buf(),
                    offset: abs,
                });
            }
            '"' => {
                if !in_char {
                    in_string = true;
                }
                chars.next();
            }
            '\'' => {
                if !in_string {
                    in_char = true;
                }
                chars.next();
            }
            _ => {
                chars.next();
            }
        }
    }

    // We broke out right after the identifier; `idx` sits on the first
    // non-identifier character. Skip intervening whitespace looking for `(`.
    let mut probe = idx;
    for (rel, c) in text[idx..].char_indices() {
        let abs = idx + rel;
        if c.is_whitespace() {
            probe = abs + c.len_utf8();
            continue;
        }
        if c == '(' {
            return find_argument_close(path, text, &ident_name, ident_start_byte, abs);
        }
        break;
    }
    let _ = probe;

    // No call syntax followed the known identifier: keep scanning past it.
    let next_start = ident_start_byte + ident_name.len();
    if next_start >= bytes_len {
        return Ok(None);
    }
    find_next_invocation(path, text, next_start, is_known)
}

fn find_argument_close(
    path: &Path,
    text: &str,
    name: &str,
    ident_start: usize,
    open_paren: usize,
) -> Result<Option<RawInvocation>> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut in_char = false;
    let mut chars = text[open_paren..].char_indices().peekable();

    while let Some(&(rel, c)) = chars.peek() {
        let abs = open_paren + rel;
        if in_string || in_char {
            match c {
                '\\' => {
                    chars.next();
                    chars.next();
                    continue;
                }
                '"' if !in_char => in_string = false,
                '\'' if !in_string => in_char = false,
                _ => {}
            }
            chars.next();
            continue;
        }

        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let close = abs;
                    return Ok(Some(RawInvocation {
                        name: name.to_string(),
                        start: ident_start,
                        end: close + 1,
                        arg_start: open_paren + 1,
                        arg_end: close,
                    }));
                }
            }
            '"' => in_string = true,
            '\'' => in_char = true,
            '\\' => {
                return Err(SupDefError::StrayBackslash {
                    path: path.to_path_buf(),
                    offset: abs,
                });
            }
            _ => {}
        }
        chars.next();
    }

    Err(SupDefError::UnterminatedInvocation {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p() -> PathBuf {
        PathBuf::from("t.c")
    }

    fn known(names: &'static [&'static str]) -> impl Fn(&str) -> bool {
        move |n: &str| names.contains(&n)
    }

    #[test]
    fn finds_simple_invocation() {
        let text = "GREET(world)";
        let inv = find_next_invocation(&p(), text, 0, known(&["GREET"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.full_text(text), "GREET(world)");
        assert_eq!(inv.arg_text(text), "world");
    }

    #[test]
    fn ignores_unknown_identifiers() {
        let text = "foo(bar) GREET(world)";
        let inv = find_next_invocation(&p(), text, 0, known(&["GREET"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.full_text(text), "GREET(world)");
    }

    #[test]
    fn skips_whitespace_before_paren() {
        let text = "GREET   (world)";
        let inv = find_next_invocation(&p(), text, 0, known(&["GREET"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.arg_text(text), "world");
    }

    #[test]
    fn ignores_call_inside_string_literal() {
        let text = r#"const char* s = "GREET(notacall)"; GREET(1)"#;
        let inv = find_next_invocation(&p(), text, 0, known(&["GREET"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.arg_text(text), "1");
    }

    #[test]
    fn no_invocation_when_name_not_called() {
        let text = "GREET; int x;";
        let inv = find_next_invocation(&p(), text, 0, known(&["GREET"])).unwrap();
        assert!(inv.is_none());
    }

    #[test]
    fn unterminated_invocation_errors() {
        let text = "GREET(world";
        let err = find_next_invocation(&p(), text, 0, known(&["GREET"])).unwrap_err();
        assert!(matches!(err, SupDefError::UnterminatedInvocation { .. }));
    }

    #[test]
    fn nested_parens_count_toward_matching_close() {
        let text = "PAIR(f(a), g(b))";
        let inv = find_next_invocation(&p(), text, 0, known(&["PAIR"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.arg_text(text), "f(a), g(b)");
    }

    #[test]
    fn unicode_identifier_is_recognised() {
        let text = "café(arg)";
        let inv = find_next_invocation(&p(), text, 0, known(&["café"]))
            .unwrap()
            .unwrap();
        assert_eq!(inv.arg_text(text), "arg");
    }
}
