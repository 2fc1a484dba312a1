//! Error types for SupDef preprocessing operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SupDef operations.
pub type Result<T> = std::result::Result<T, SupDefError>;

/// Comprehensive error type for every fatal condition the preprocessor can hit.
///
/// Errors are designed to fail fast and carry enough context (file, offset,
/// macro name) that a caller never has to re-derive it from a bare string.
#[derive(Error, Debug)]
pub enum SupDefError {
    /// Filesystem error reading an input unit or writing output.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A backslash-escaped literal ran off the end of the text.
    #[error("unterminated string or character literal in {path} at offset {offset}")]
    UnterminatedLiteral {
        /// File in which the literal started.
        path: PathBuf,
        /// Byte offset of the offending backslash.
        offset: usize,
    },

    /// A backslash outside any literal was not a line continuation.
    #[error("stray backslash outside string/character literal in {path} at offset {offset}")]
    StrayBackslash {
        /// File containing the backslash.
        path: PathBuf,
        /// Byte offset of the backslash.
        offset: usize,
    },

    /// A `#pragma supdef` directive was malformed.
    #[error("malformed pragma in {path} at line {line}: {reason}")]
    BadPragma {
        /// File containing the pragma.
        path: PathBuf,
        /// 1-based line number of the `begin`/pragma line.
        line: usize,
        /// Human-readable description (unknown option, duplicate selector, missing `end`, …).
        reason: String,
    },

    /// An `import` pragma's target could not be found on any search path.
    #[error("import target not found: {target} (searched from {from})")]
    NotFound {
        /// The path written inside `<...>`.
        target: String,
        /// The importing file.
        from: PathBuf,
    },

    /// An `import` pragma's target matched more than one search-path candidate.
    #[error("import target ambiguous: {target} matched {count} candidates (searched from {from})")]
    Ambiguous {
        /// The path written inside `<...>`.
        target: String,
        /// The importing file.
        from: PathBuf,
        /// Number of matching candidates.
        count: usize,
    },

    /// An import graph revisited a unit already on the current resolution stack.
    #[error("import cycle detected: {path} imports itself transitively")]
    Cycle {
        /// The path that was about to be imported a second time.
        path: PathBuf,
    },

    /// An invocation named a macro absent from the registry.
    #[error("unknown macro `{name}` invoked in {path}")]
    UnknownMacro {
        /// The invoked name.
        name: String,
        /// File in which the invocation occurs.
        path: PathBuf,
    },

    /// A `name(` open paren was never closed.
    #[error("unterminated invocation of `{name}` in {path}")]
    UnterminatedInvocation {
        /// The macro name whose argument list never closed.
        name: String,
        /// File in which the invocation occurs.
        path: PathBuf,
    },

    /// The compiler invoked by a runnable macro exited non-zero.
    #[error("compilation failed for runnable macro `{name}` (exit code {code:?})")]
    CompileFailed {
        /// The runnable macro's name.
        name: String,
        /// Exit code reported by the compiler, if any.
        code: Option<i32>,
    },

    /// The compiled artifact for a runnable macro could not be executed.
    #[error("failed to execute artifact for runnable macro `{name}`: {reason}")]
    ExecuteFailed {
        /// The runnable macro's name.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// A runnable macro requested a language other than `c`/`c++`.
    #[error("unsupported language `{language}` for runnable macro `{name}`")]
    UnsupportedLanguage {
        /// The runnable macro's name.
        name: String,
        /// The offending language token.
        language: String,
    },

    /// A user-supplied `--cc-cmdline` template was malformed (missing placeholder).
    #[error("invalid compiler command template: {reason}")]
    Config {
        /// Description of what is missing or invalid.
        reason: String,
    },
}

impl SupDefError {
    /// Build an [`SupDefError::Io`] from a path and the underlying error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
