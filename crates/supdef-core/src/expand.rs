//! Expander (C7): recursive per-invocation expansion plus the top-level
//! fixed-point driver that repeatedly rescans a document until quiescent.

use crate::config::Configuration;
use crate::error::Result;
use crate::pragma::Pragma;
use crate::registry::MacroRegistry;
use crate::runnable::{evaluate, Compile, Run};
use crate::scan::find_next_invocation;
use crate::split::split_arguments;
use crate::substitute::substitute;
use std::path::Path;

/// An argument shorter than this cannot possibly contain a full `name()`
/// invocation, so scanning it is skipped (§4.7).
const MIN_INVOCATION_LEN: usize = 3;

/// Run one left-to-right pass over `text`, replacing every invocation of a
/// known macro exactly once (recursing into each invocation's arguments
/// first, per §4.7). Returns the rewritten text and the number of
/// replacements performed.
fn expand_pass(
    path: &Path,
    text: &str,
    registry: &MacroRegistry,
    config: &Configuration,
    compiler: &dyn Compile,
    runner: &dyn Run,
) -> Result<(String, usize)> {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let mut replacements = 0usize;

    loop {
        let Some(invocation) = find_next_invocation(path, text, cursor, |n| registry.contains(n))?
        else {
            out.push_str(&text[cursor..]);
            break;
        };

        out.push_str(&text[cursor..invocation.start]);
        let arg_text = invocation.arg_text(text);
        let replacement = expand_invocation(
            path,
            &invocation.name,
            arg_text,
            registry,
            config,
            compiler,
            runner,
        )?;
        out.push_str(&replacement);
        replacements += 1;
        cursor = invocation.end;
    }

    Ok((out, replacements))
}

/// Expand one invocation: split its arguments, recursively expand any
/// invocation nested in each argument, then substitute via the macro's own
/// kind (Define or Runnable).
fn expand_invocation(
    path: &Path,
    name: &str,
    arg_text: &str,
    registry: &MacroRegistry,
    config: &Configuration,
    compiler: &dyn Compile,
    runner: &dyn Run,
) -> Result<String> {
    let args: Vec<String> = split_arguments(arg_text)
        .into_iter()
        .map(|arg| {
            if arg.len() < MIN_INVOCATION_LEN {
                Ok(arg)
            } else {
                expand_pass(path, &arg, registry, config, compiler, runner)
                    .map(|(expanded, _)| expanded)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let pragma = registry.get(name).expect("invocation name is registered");
    match pragma {
        Pragma::Define { body, .. } => Ok(substitute(body, &args)),
        Pragma::Runnable {
            body, language, op, ..
        } => {
            let substituted = substitute(body, &args);
            evaluate(name, &substituted, *language, *op, config, compiler, runner)
        }
        Pragma::Import { .. } => unreachable!("import pragmas are never registered as macros"),
    }
}

/// Top-level fixed-point driver: rescans the whole document from the start
/// after every stage, stopping when a pass performs zero replacements.
///
/// When `max_stages` is `Some(n)`, expansion stops after `n` stages even if
/// the document has not reached quiescence (an implementer's escape hatch,
/// not part of the observable contract for terminating documents).
pub fn expand_document(
    path: &Path,
    text: &str,
    registry: &MacroRegistry,
    config: &Configuration,
    compiler: &dyn Compile,
    runner: &dyn Run,
    max_stages: Option<usize>,
) -> Result<String> {
    let mut current = text.to_string();
    let mut stage = 0usize;

    loop {
        let (next, replacements) = expand_pass(path, &current, registry, config, compiler, runner)?;
        stage += 1;
        log::debug!("stage {stage}: {replacements} replacement(s)");
        current = next;

        if replacements == 0 {
            break;
        }
        if let Some(limit) = max_stages {
            if stage >= limit {
                log::warn!(
                    "stopping after {limit} stages (--max-stages); document may not be quiescent"
                );
                break;
            }
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pragma::{scan_pragmas, Language};
    use crate::runnable::ProcessOutput;
    use crate::unit::InputUnit;
    use std::path::PathBuf;

    struct NoCompiler;
    impl Compile for NoCompiler {
        fn compile(
            &self,
            _source: &str,
            _lang: Language,
            _out_path: &Path,
            _config: &Configuration,
        ) -> Result<bool> {
            unreachable!("no runnable macros in these tests")
        }
    }
    struct NoRunner;
    impl Run for NoRunner {
        fn run(&self, _artifact_path: &Path) -> Result<ProcessOutput> {
            unreachable!("no runnable macros in these tests")
        }
    }

    fn unit(text: &str) -> InputUnit {
        let path = PathBuf::from("doc.sd");
        let items = scan_pragmas(&path, text).unwrap();
        InputUnit::new(path, text.to_string(), items)
    }

    #[test]
    fn expands_simple_define() {
        let root = unit(concat!(
            "#pragma supdef begin GREET\nHello, $1!\n#pragma supdef end\n",
            "GREET(world)\n",
        ));
        let registry = MacroRegistry::build(&root);
        let config = Configuration::default();
        let out = expand_document(
            &root.path,
            &root.rendered_text(),
            &registry,
            &config,
            &NoCompiler,
            &NoRunner,
            None,
        )
        .unwrap();
        assert!(out.contains("Hello, world!"));
    }

    #[test]
    fn expands_nested_invocation_in_argument_first() {
        let root = unit(concat!(
            "#pragma supdef begin WRAP\n[$1]\n#pragma supdef end\n",
            "#pragma supdef begin GREET\nHi $1\n#pragma supdef end\n",
            "WRAP(GREET(bob))\n",
        ));
        let registry = MacroRegistry::build(&root);
        let config = Configuration::default();
        let out = expand_document(
            &root.path,
            &root.rendered_text(),
            &registry,
            &config,
            &NoCompiler,
            &NoRunner,
            None,
        )
        .unwrap();
        assert!(out.contains("[Hi bob]"));
    }

    #[test]
    fn reaches_quiescence_when_no_invocations_remain() {
        let root = unit("plain text only\n");
        let registry = MacroRegistry::build(&root);
        let config = Configuration::default();
        let out = expand_document(
            &root.path,
            &root.rendered_text(),
            &registry,
            &config,
            &NoCompiler,
            &NoRunner,
            None,
        )
        .unwrap();
        assert_eq!(out, "plain text only\n");
    }

    #[test]
    fn max_stages_caps_runaway_self_referential_macro() {
        let root = unit(concat!(
            "#pragma supdef begin LOOP\nLOOP($1)\n#pragma supdef end\n",
            "LOOP(x)\n",
        ));
        let registry = MacroRegistry::build(&root);
        let config = Configuration::default();
        let out = expand_document(
            &root.path,
            &root.rendered_text(),
            &registry,
            &config,
            &NoCompiler,
            &NoRunner,
            Some(3),
        )
        .unwrap();
        assert!(out.contains("LOOP(x)"));
    }
}
