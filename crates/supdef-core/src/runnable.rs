//! Runnable macro evaluator (C9): compiling a macro body with the
//! configured C/C++ compiler and capturing the result of running it.

use crate::config::Configuration;
use crate::error::{Result, SupDefError};
use crate::pragma::{Language, RunnableOp};
use std::path::Path;
use std::process::Command;

/// Captured result of running a compiled artifact.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Raw stdout bytes.
    pub stdout: Vec<u8>,
    /// Raw stderr bytes.
    pub stderr: Vec<u8>,
    /// Process exit code (0 if terminated by signal, mirroring `Command`'s reporting).
    pub code: i32,
}

/// Seam for invoking a compiler, so the evaluator is testable without
/// spawning a real toolchain.
pub trait Compile {
    /// Compile `source` (already substituted) as `lang` into `out_path`.
    /// Returns `Ok(true)` if the compiler exited zero, `Ok(false)` otherwise;
    /// only a failure to even launch the compiler is an `Err`.
    fn compile(
        &self,
        source: &str,
        lang: Language,
        out_path: &Path,
        config: &Configuration,
    ) -> Result<bool>;
}

/// Seam for executing a compiled artifact.
pub trait Run {
    /// Execute `artifact_path`, capturing its output.
    fn run(&self, artifact_path: &Path) -> Result<ProcessOutput>;
}

/// Production [`Compile`] implementation: shells out via [`Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCompiler;

impl Compile for ProcessCompiler {
    fn compile(
        &self,
        source: &str,
        lang: Language,
        out_path: &Path,
        config: &Configuration,
    ) -> Result<bool> {
        let infile = tempfile::Builder::new()
            .suffix(source_suffix(lang))
            .tempfile()
            .map_err(|e| SupDefError::io(Path::new("<tmp input>"), e))?;
        std::fs::write(infile.path(), source)
            .map_err(|e| SupDefError::io(infile.path(), e))?;

        let argv = config.render_cmdline(infile.path(), out_path, lang.as_compiler_flag());
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SupDefError::Config {
                reason: "empty compiler command line".to_string(),
            })?;

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| SupDefError::ExecuteFailed {
                name: "<compiler>".to_string(),
                reason: e.to_string(),
            })?;

        Ok(status.success())
    }
}

fn source_suffix(lang: Language) -> &'static str {
    match lang {
        Language::C => ".c",
        Language::Cpp => ".cpp",
    }
}

/// Production [`Run`] implementation: executes the artifact directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Run for ProcessRunner {
    fn run(&self, artifact_path: &Path) -> Result<ProcessOutput> {
        let output = Command::new(artifact_path)
            .output()
            .map_err(|e| SupDefError::ExecuteFailed {
                name: artifact_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code().unwrap_or(0),
        })
    }
}

/// Evaluate a runnable macro's already-substituted body, per §4.9.
pub fn evaluate(
    name: &str,
    body: &str,
    lang: Language,
    op: RunnableOp,
    config: &Configuration,
    compiler: &dyn Compile,
    runner: &dyn Run,
) -> Result<String> {
    let out_dir = tempfile::tempdir().map_err(|e| SupDefError::io(Path::new("<tmp dir>"), e))?;
    let out_path = out_dir.path().join("artifact");

    let compiled = compiler.compile(body, lang, &out_path, config)?;

    if op == RunnableOp::TryCompile {
        return Ok(if compiled { "1".to_string() } else { String::new() });
    }

    if !compiled {
        return Err(SupDefError::CompileFailed {
            name: name.to_string(),
            code: None,
        });
    }

    let output = runner.run(&out_path)?;

    Ok(match op {
        RunnableOp::Stdout => String::from_utf8_lossy(&output.stdout).into_owned(),
        RunnableOp::Stderr => String::from_utf8_lossy(&output.stderr).into_owned(),
        RunnableOp::Retcode => output.code.to_string(),
        RunnableOp::TryCompile => unreachable!("handled above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCompiler {
        succeeds: bool,
    }

    impl Compile for StubCompiler {
        fn compile(
            &self,
            _source: &str,
            _lang: Language,
            _out_path: &Path,
            _config: &Configuration,
        ) -> Result<bool> {
            Ok(self.succeeds)
        }
    }

    struct StubRunner {
        output: ProcessOutput,
    }

    impl Run for StubRunner {
        fn run(&self, _artifact_path: &Path) -> Result<ProcessOutput> {
            Ok(ProcessOutput {
                stdout: self.output.stdout.clone(),
                stderr: self.output.stderr.clone(),
                code: self.output.code,
            })
        }
    }

    fn config() -> Configuration {
        Configuration::default()
    }

    #[test]
    fn trycompile_success_yields_one() {
        let compiler = StubCompiler { succeeds: true };
        let runner = StubRunner {
            output: ProcessOutput {
                stdout: Vec::new(),
                stderr: Vec::new(),
                code: 0,
            },
        };
        let result = evaluate(
            "T",
            "int main(){}",
            Language::C,
            RunnableOp::TryCompile,
            &config(),
            &compiler,
            &runner,
        )
        .unwrap();
        assert_eq!(result, "1");
    }

    #[test]
    fn trycompile_failure_yields_empty_string() {
        let compiler = StubCompiler { succeeds: false };
        let runner = StubRunner {
            output: ProcessOutput {
                stdout: Vec::new(),
                stderr: Vec::new(),
                code: 0,
            },
        };
        let result = evaluate(
            "T",
            "not c code",
            Language::C,
            RunnableOp::TryCompile,
            &config(),
            &compiler,
            &runner,
        )
        .unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn stdout_op_returns_captured_stdout() {
        let compiler = StubCompiler { succeeds: true };
        let runner = StubRunner {
            output: ProcessOutput {
                stdout: b"hello\n".to_vec(),
                stderr: Vec::new(),
                code: 0,
            },
        };
        let result = evaluate(
            "T",
            "int main(){puts(\"hello\");}",
            Language::C,
            RunnableOp::Stdout,
            &config(),
            &compiler,
            &runner,
        )
        .unwrap();
        assert_eq!(result, "hello\n");
    }

    #[test]
    fn retcode_op_returns_decimal_exit_code() {
        let compiler = StubCompiler { succeeds: true };
        let runner = StubRunner {
            output: ProcessOutput {
                stdout: Vec::new(),
                stderr: Vec::new(),
                code: 7,
            },
        };
        let result = evaluate(
            "T",
            "int main(){return 7;}",
            Language::C,
            RunnableOp::Retcode,
            &config(),
            &compiler,
            &runner,
        )
        .unwrap();
        assert_eq!(result, "7");
    }

    #[test]
    fn compile_failure_is_fatal_for_non_trycompile_ops() {
        let compiler = StubCompiler { succeeds: false };
        let runner = StubRunner {
            output: ProcessOutput {
                stdout: Vec::new(),
                stderr: Vec::new(),
                code: 0,
            },
        };
        let err = evaluate(
            "T",
            "garbage",
            Language::C,
            RunnableOp::Stdout,
            &config(),
            &compiler,
            &runner,
        )
        .unwrap_err();
        assert!(matches!(err, SupDefError::CompileFailed { .. }));
    }
}
