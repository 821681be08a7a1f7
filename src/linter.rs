use crate::exit_code;
use std::process::Command;
use tracing::debug;

/// Captured result of one linter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl LintOutput {
    /// Stand-in for a run over an empty change set: nothing inspected, clean exit.
    pub fn empty() -> Self {
        Self {
            stdout: r#"{"files":[],"summary":{"offense_count":0,"inspected_file_count":0}}"#
                .to_string(),
            exit_code: exit_code::SUCCESS,
        }
    }

    /// The linter could not be started at all.
    pub fn unavailable() -> Self {
        Self {
            stdout: String::new(),
            exit_code: exit_code::LINTER_UNAVAILABLE,
        }
    }
}

pub trait Linter {
    /// `None` lints the whole tree. A nonzero exit is a normal outcome.
    fn run(&self, files: Option<&[String]>) -> std::io::Result<LintOutput>;
}

#[derive(Debug, Clone)]
pub struct RubocopLinter {
    program: String,
    args: Vec<String>,
}

impl RubocopLinter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, files: Option<&[String]>) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("--format").arg("json");
        if let Some(files) = files {
            command.arg("--force-exclusion").args(files);
        }
        command
    }
}

impl Linter for RubocopLinter {
    fn run(&self, files: Option<&[String]>) -> std::io::Result<LintOutput> {
        let mut command = self.command(files);
        debug!(?command, "running linter");
        let output = command.output()?;
        Ok(LintOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            exit_code: output.status.code().unwrap_or(exit_code::FAILURE),
        })
    }
}
