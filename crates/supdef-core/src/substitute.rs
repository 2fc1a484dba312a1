//! Define-body substitution (C8): replacing `$1`, `$2`, ... placeholders in
//! a macro body with the corresponding call argument.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+)").unwrap());

/// Substitute every `$N` placeholder in `body` with `args[N-1]`.
///
/// Matches the original implementation's unconditional literal-string-replace
/// semantics: a placeholder referring past the end of `args` is left
/// untouched rather than rejected, since a `Define` pragma carries no arity
/// declaration to validate against.
pub fn substitute(body: &str, args: &[String]) -> String {
    PLACEHOLDER_RE
        .replace_all(body, |caps: &regex::Captures| {
            let n: usize = caps[1].parse().unwrap_or(0);
            if n >= 1 {
                if let Some(arg) = args.get(n - 1) {
                    return arg.clone();
                }
            }
            caps[0].to_string()
        })
        .into_owned()
}
