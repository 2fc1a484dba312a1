//! Source-level macro preprocessor for C and C++.
//!
//! A document is lexically normalised, scanned for `#pragma supdef`
//! directives (imports, defines, runnable macros), then repeatedly rescanned
//! and rewritten until no further macro invocation is found. See
//! [`preprocess_file`] for the single entry point most callers need.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod expand;
pub mod import;
pub mod normalize;
pub mod pragma;
pub mod registry;
pub mod runnable;
pub mod scan;
pub mod split;
pub mod substitute;
pub mod unit;

pub use config::Configuration;
pub use error::{Result, SupDefError};
pub use registry::MacroRegistry;
pub use runnable::{Compile, ProcessCompiler, ProcessOutput, ProcessRunner, Run};
pub use unit::InputUnit;

use std::collections::HashSet;
use std::path::Path;

/// Preprocess `path` end to end: build its import tree, register every
/// Define/Runnable macro declared anywhere in it, then expand the root
/// unit's text to a fixed point.
///
/// This is the library's single production entry point; it always uses
/// [`ProcessCompiler`]/[`ProcessRunner`] for runnable macros. Callers that
/// need to substitute a stub compiler (tests, dry runs) should call
/// [`import::build_unit_tree`], [`registry::MacroRegistry::build`], and
/// [`expand::expand_document`] directly.
pub fn preprocess_file(path: &Path, config: &Configuration, max_stages: Option<usize>) -> Result<String> {
    let mut stack = HashSet::new();
    let root = import::build_unit_tree(path, config, &mut stack)?;
    let registry = MacroRegistry::build(&root);
    expand::expand_document(
        &root.path,
        &root.rendered_text(),
        &registry,
        config,
        &ProcessCompiler,
        &ProcessRunner,
        max_stages,
    )
}
