//! Immutable configuration threaded through every pipeline stage.
//!
//! There is no process-wide mutable state: a single [`Configuration`] value
//! is built once (typically from CLI arguments, see the `supdef` binary) and
//! passed by reference to the components that need it.

use crate::error::{Result, SupDefError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The three placeholders a compiler command-line template must contain.
pub const CC_PLACEHOLDER: &str = "#CC#";
/// Placeholder expanded to `-x<lang> <infile> -x none`.
pub const IN_PLACEHOLDER: &str = "#IN#";
/// Placeholder expanded to the output artifact path.
pub const OUT_PLACEHOLDER: &str = "#OUT#";

/// Default compiler command-line template, equivalent to a plain `cc -x<lang> in -x none -o out`.
pub const DEFAULT_CMDLINE: &str = "#CC# #IN# -o #OUT#";

/// Immutable, validated configuration for a single preprocessing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Ordered list of directories consulted for `import` resolution (`-I`, in given order).
    pub search_paths: Vec<PathBuf>,
    /// Path to the compiler executable invoked by runnable macros.
    pub compiler_path: PathBuf,
    /// Shell-splittable command-line template for invoking the compiler.
    pub compiler_cmdline: String,
    /// Verbose tracing flag (`-d`/`--debug`).
    pub debug: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            compiler_path: PathBuf::from("cc"),
            compiler_cmdline: DEFAULT_CMDLINE.to_string(),
            debug: false,
        }
    }
}

impl Configuration {
    /// Validate that `cmdline` contains all three required placeholders.
    ///
    /// Construction-time validation keeps `#IN#`/`#OUT#`/`#CC#` substitution
    /// in the runnable evaluator infallible.
    pub fn validate_cmdline(cmdline: &str) -> Result<()> {
        for placeholder in [CC_PLACEHOLDER, IN_PLACEHOLDER, OUT_PLACEHOLDER] {
            if !cmdline.contains(placeholder) {
                return Err(SupDefError::Config {
                    reason: format!("missing {placeholder} placeholder in command template"),
                });
            }
        }
        Ok(())
    }

    /// Build a configuration, validating the compiler command-line template.
    pub fn new(
        search_paths: Vec<PathBuf>,
        compiler_path: PathBuf,
        compiler_cmdline: String,
        debug: bool,
    ) -> Result<Self> {
        Self::validate_cmdline(&compiler_cmdline)?;
        Ok(Self {
            search_paths,
            compiler_path,
            compiler_cmdline,
            debug,
        })
    }

    /// Materialise the full compiler command line for one runnable invocation.
    ///
    /// `lang` must already be normalised to `"c"` or `"c++"`.
    pub fn render_cmdline(&self, infile: &Path, outfile: &Path, lang: &str) -> Vec<String> {
        let in_fragment = format!("-x{lang} {} -x none", infile.display());
        let rendered = self
            .compiler_cmdline
            .replace(CC_PLACEHOLDER, &self.compiler_path.display().to_string())
            .replace(IN_PLACEHOLDER, &in_fragment)
            .replace(OUT_PLACEHOLDER, &outfile.display().to_string());
        shell_words::split(&rendered).unwrap_or_else(|_| {
            rendered
                .split_whitespace()
                .map(str::to_string)
                .collect()
        })
    }
}
