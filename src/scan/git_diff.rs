use super::RevisionDiff;
use crate::error::{CheckError, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Added, copied, modified, renamed and type-changed. Deletions are excluded.
pub const DIFF_FILTER: &str = "--diff-filter=ACMRT";

#[derive(Debug, Clone)]
pub struct GitDiff {
    program: String,
    root: PathBuf,
}

impl GitDiff {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }
}

impl RevisionDiff for GitDiff {
    fn changed_files(&self, base: &str, head: &str) -> Result<String> {
        debug!(program = %self.program, base, head, "running revision diff");
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(&self.root)
            .arg("diff")
            .arg("--name-only")
            .arg("-z")
            .arg(DIFF_FILTER)
            .arg(base)
            .arg(head)
            .output()?;

        if !output.status.success() {
            return Err(CheckError::Diff {
                status: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
