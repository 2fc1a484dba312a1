//! Pragma scanning (C2): recognising `import`, `define`, and `runnable`
//! `#pragma supdef` directives in normalised text.

use crate::error::{Result, SupDefError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*pragma\s+supdef\s+import\s*<(.+)>\s*$").unwrap());
static DEFINE_BEGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*pragma\s+supdef\s+begin\s+(\w+)\s*$").unwrap());
static END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*pragma\s+supdef\s+end\s*$").unwrap());

const LANGUAGE_TOKENS: &[&str] = &["C", "CPP", "CXX", "c", "cpp", "cxx"];
const OP_TOKENS: &[&str] = &[
    "trycompile",
    "retcode",
    "stderr",
    "stdout",
    "TRYCOMPILE",
    "RETCODE",
    "STDERR",
    "STDOUT",
];

static RUNNABLE_BEGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let opt = format!(
        "(?:{})",
        LANGUAGE_TOKENS
            .iter()
            .chain(OP_TOKENS.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("|")
    );
    let pattern = format!(r"^\s*#\s*pragma\s+supdef\s+runnable\s+({opt}(?:\s+{opt})*)\s+begin\s+(\w+)\s*$");
    Regex::new(&pattern).unwrap()
});

/// Source language for a runnable macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// C (the default).
    #[default]
    C,
    /// C++.
    Cpp,
}

impl Language {
    /// Parse one of the accepted option tokens, case-insensitively.
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "c" => Some(Language::C),
            "cpp" | "cxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// The `-x<lang>` fragment used in the compiler command template.
    pub fn as_compiler_flag(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "c++",
        }
    }
}

/// Which channel of the compiled-and-run subprocess becomes the replacement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnableOp {
    /// Captured standard output (the default).
    #[default]
    Stdout,
    /// Captured standard error.
    Stderr,
    /// Decimal exit code of the executed artifact.
    Retcode,
    /// `"1"` if compilation succeeded, `""` otherwise; never executes the artifact.
    TryCompile,
}

impl RunnableOp {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "stdout" => Some(RunnableOp::Stdout),
            "stderr" => Some(RunnableOp::Stderr),
            "retcode" => Some(RunnableOp::Retcode),
            "trycompile" => Some(RunnableOp::TryCompile),
            _ => None,
        }
    }
}

/// A single `#pragma supdef` directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Pragma {
    /// `#pragma supdef import <path>`
    Import {
        /// The path written between `<` and `>`, unresolved.
        target: String,
    },
    /// `#pragma supdef begin NAME ... end`
    Define {
        /// Macro name.
        name: String,
        /// Body text, trimmed of outermost whitespace.
        body: String,
    },
    /// `#pragma supdef runnable <opts> begin NAME ... end`
    Runnable {
        /// Macro name.
        name: String,
        /// Body text, trimmed of outermost whitespace.
        body: String,
        /// Source language (default C).
        language: Language,
        /// Output channel selector (default stdout).
        op: RunnableOp,
    },
}

impl Pragma {
    /// The macro's declared name (the import target, for `Import`).
    pub fn name(&self) -> &str {
        match self {
            Pragma::Import { target } => target,
            Pragma::Define { name, .. } => name,
            Pragma::Runnable { name, .. } => name,
        }
    }
}

/// One line of an [`InputUnit`](crate::unit::InputUnit)'s normalised text:
/// either a directive or a plain source line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    /// A recognised `#pragma supdef` directive, tagged with the 1-based
    /// line number of its `begin`/import line in the normalised text.
    Pragma {
        /// 1-based line number of the directive's first line (`import` or `begin`).
        line: usize,
        /// Total number of source lines this directive spans (1 for `import`,
        /// `end_line - line + 1` for a `begin`/`end` block). Used to emit the
        /// same number of blank lines in place of the directive in the final
        /// output, preserving line numbers outside pragma blocks.
        span_lines: usize,
        /// The parsed directive.
        pragma: Pragma,
    },
    /// An ordinary source line, preserved verbatim.
    Text {
        /// 1-based line number.
        line: usize,
        /// The line's text (without trailing `\n`).
        text: String,
    },
}

/// Scan normalised text into an ordered sequence of [`LineItem`]s.
pub fn scan_pragmas(path: &Path, normalized_text: &str) -> Result<Vec<LineItem>> {
    let lines: Vec<&str> = normalized_text.split('\n').collect();
    let mut items = Vec::with_capacity(lines.len());
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        let line_no = i + 1;

        if let Some(caps) = IMPORT_RE.captures(line) {
            items.push(LineItem::Pragma {
                line: line_no,
                span_lines: 1,
                pragma: Pragma::Import {
                    target: caps[1].trim().to_string(),
                },
            });
            i += 1;
        } else if let Some(caps) = DEFINE_BEGIN_RE.captures(line) {
            let name = caps[1].to_string();
            let (body, next) = collect_block(path, &lines, i + 1, line_no, &name)?;
            items.push(LineItem::Pragma {
                line: line_no,
                span_lines: next - i,
                pragma: Pragma::Define { name, body },
            });
            i = next;
        } else if let Some(caps) = RUNNABLE_BEGIN_RE.captures(line) {
            let opts: Vec<&str> = caps[1].split_whitespace().collect();
            let name = caps[2].to_string();
            let (language, op) = parse_runnable_options(path, line_no, &opts)?;
            let (body, next) = collect_block(path, &lines, i + 1, line_no, &name)?;
            items.push(LineItem::Pragma {
                line: line_no,
                span_lines: next - i,
                pragma: Pragma::Runnable {
                    name,
                    body,
                    language,
                    op,
                },
            });
            i = next;
        } else {
            items.push(LineItem::Text {
                line: line_no,
                text: line.to_string(),
            });
            i += 1;
        }
    }

    Ok(items)
}

/// Collect every line between a `begin` (at `start`, the line after it)
/// and the matching `end`, joining with `\n` and trimming outermost whitespace.
fn collect_block(
    path: &Path,
    lines: &[&str],
    start: usize,
    begin_line: usize,
    name: &str,
) -> Result<(String, usize)> {
    let mut body_lines = Vec::new();
    let mut j = start;
    while j < lines.len() {
        if END_RE.is_match(lines[j]) {
            return Ok((body_lines.join("\n").trim().to_string(), j + 1));
        }
        body_lines.push(lines[j]);
        j += 1;
    }
    Err(SupDefError::BadPragma {
        path: path.to_path_buf(),
        line: begin_line,
        reason: format!("`begin {name}` has no matching `end`"),
    })
}

fn parse_runnable_options(
    path: &Path,
    line: usize,
    opts: &[&str],
) -> Result<(Language, RunnableOp)> {
    let mut language = None;
    let mut op = None;
    for opt in opts {
        if let Some(lang) = Language::from_token(opt) {
            if language.is_some() {
                return Err(SupDefError::BadPragma {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("multiple languages specified ({opt})"),
                });
            }
            language = Some(lang);
        } else if let Some(parsed_op) = RunnableOp::from_token(opt) {
            if op.is_some() {
                return Err(SupDefError::BadPragma {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("multiple operations specified ({opt})"),
                });
            }
            op = Some(parsed_op);
        } else {
            return Err(SupDefError::BadPragma {
                path: path.to_path_buf(),
                line,
                reason: format!("unknown runnable option `{opt}`"),
            });
        }
    }
    Ok((language.unwrap_or_default(), op.unwrap_or_default()))
}
