//! Lexical pre-normalisation: line-continuation backslashes and comments.
//!
//! Two passes run over the raw file text before anything else touches it:
//!
//! 1. [`strip_backslashes`] elides `\`-newline line continuations outside
//!    literals and validates every other backslash.
//! 2. [`elide_comments`] blanks out `//` and `/* */` comments, leaving
//!    string and character literals untouched.
//!
//! After both passes the invariant relied on by every later component holds:
//! no comments remain, and `\` outside a literal is never meaningful again.

use crate::error::{Result, SupDefError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Elide line-continuation backslashes, validating every other backslash use.
///
/// `in_string`/`in_char` track literal state exactly as the invocation
/// scanner (C5) later does; a `"` while `in_char` (or a `'` while
/// `in_string`) is inert rather than toggling anything.
pub fn strip_backslashes(path: &Path, text: &str) -> Result<String> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut in_char = false;
    let mut i = 0;

    while i < len {
        let c = chars[i];
        match c {
            '\\' => {
                if in_string || in_char {
                    if i + 1 < len {
                        out.push(c);
                        out.push(chars[i + 1]);
                        i += 2;
                    } else {
                        return Err(SupDefError::UnterminatedLiteral {
                            path: path.to_path_buf(),
                            offset: i,
                        });
                    }
                } else if i + 1 < len && chars[i + 1] == '\n' {
                    i += 2;
                } else {
                    return Err(SupDefError::StrayBackslash {
                        path: path.to_path_buf(),
                        offset: i,
                    });
                }
            }
            '"' => {
                if !in_char {
                    in_string = !in_string;
                }
                out.push(c);
                i += 1;
            }
            '\'' => {
                if !in_string {
                    in_char = !in_char;
                }
                out.push(c);
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

// Literal forms are listed before the comment forms so the alternation
// prefers consuming a whole string/char literal over treating a `//`
// inside it as a line comment.
static COMMENT_OR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)'(?:\\.|[^\\'])*'|"(?:\\.|[^\\"])*"|//[^\n]*|/\*.*?\*/"#).unwrap()
});

/// Replace every `//` and `/* */` comment with a single space, leaving
/// string and character literals exactly as written.
pub fn elide_comments(text: &str) -> String {
    COMMENT_OR_LITERAL
        .replace_all(text, |caps: &regex::Captures| {
            let matched = &caps[0];
            if matched.starts_with('/') {
                " ".to_string()
            } else {
                matched.to_string()
            }
        })
        .into_owned()
}

/// Run both normalisation passes in order: backslashes first, then comments.
pub fn normalize(path: &Path, raw_text: &str) -> Result<String> {
    let debackslashed = strip_backslashes(path, raw_text)?;
    Ok(elide_comments(&debackslashed))
}
