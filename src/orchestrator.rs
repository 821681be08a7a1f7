use crate::error::CheckError;
use crate::exit_code;
use crate::github::{CheckRunId, CheckRuns};
use crate::linter::{LintOutput, Linter};
use crate::report;
use crate::scan::{self, RevisionDiff};
use crate::types::annotation::CheckRunOutput;
use crate::types::config::RunConfig;
use chrono::Utc;
use tracing::{error, info, warn};

/// Every state one run passes through. Terminal states carry the process exit
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Init,
    FileSetResolved {
        files: Option<Vec<String>>,
    },
    CheckRunOpen {
        id: CheckRunId,
        files: Option<Vec<String>>,
    },
    Linted {
        id: CheckRunId,
        output: LintOutput,
    },
    Reported {
        id: CheckRunId,
        payload: CheckRunOutput,
        exit_code: i32,
    },
    Closed {
        exit_code: i32,
        closed_remotely: bool,
    },
    AbortedBeforeOpen {
        exit_code: i32,
    },
    AbortedAfterOpen {
        exit_code: i32,
        closed_remotely: bool,
    },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Closed { .. } | Self::AbortedBeforeOpen { .. } | Self::AbortedAfterOpen { .. }
        )
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Closed { exit_code, .. }
            | Self::AbortedBeforeOpen { exit_code }
            | Self::AbortedAfterOpen { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::FileSetResolved { .. } => "file_set_resolved",
            Self::CheckRunOpen { .. } => "check_run_open",
            Self::Linted { .. } => "linted",
            Self::Reported { .. } => "reported",
            Self::Closed { .. } => "closed",
            Self::AbortedBeforeOpen { .. } => "aborted_before_open",
            Self::AbortedAfterOpen { .. } => "aborted_after_open",
        }
    }
}

pub struct Orchestrator<D, L, C> {
    config: RunConfig,
    diff: D,
    linter: L,
    check_runs: C,
}

impl<D, L, C> Orchestrator<D, L, C>
where
    D: RevisionDiff,
    L: Linter,
    C: CheckRuns,
{
    pub fn new(config: RunConfig, diff: D, linter: L, check_runs: C) -> Self {
        Self {
            config,
            diff,
            linter,
            check_runs,
        }
    }

    /// Drive the run to a terminal state and return the process exit status.
    pub fn run(&self) -> i32 {
        let mut state = RunState::Init;
        while !state.is_terminal() {
            state = self.step(state);
            info!(state = state.name(), "run state");
        }
        state.exit_code().unwrap_or(exit_code::FAILURE)
    }

    /// Perform exactly one transition. Terminal states are returned unchanged.
    pub fn step(&self, state: RunState) -> RunState {
        match state {
            RunState::Init => self.resolve_files(),
            RunState::FileSetResolved { files } => self.open(files),
            RunState::CheckRunOpen { id, files } => self.lint(id, files),
            RunState::Linted { id, output } => self.report(id, output),
            RunState::Reported {
                id,
                payload,
                exit_code,
            } => RunState::Closed {
                exit_code,
                closed_remotely: self.close(id, &payload),
            },
            terminal => terminal,
        }
    }

    fn resolve_files(&self) -> RunState {
        match scan::resolve_change_set(&self.diff, self.config.changes.as_ref()) {
            Ok(files) => {
                match &files {
                    Some(files) => info!(count = files.len(), "linting changed files only"),
                    None => info!("linting all files"),
                }
                RunState::FileSetResolved { files }
            }
            Err(err) => {
                error!(error = %err, "could not resolve changed files");
                RunState::AbortedBeforeOpen {
                    exit_code: err.exit_code(),
                }
            }
        }
    }

    fn open(&self, files: Option<Vec<String>>) -> RunState {
        match self.check_runs.create(&self.config.commit_sha, Utc::now()) {
            Ok(id) => {
                info!(%id, repository = %self.config.repository, "check run opened");
                RunState::CheckRunOpen { id, files }
            }
            Err(err) => {
                error!(error = %err, "could not create check run");
                RunState::AbortedBeforeOpen {
                    exit_code: exit_code::FAILURE,
                }
            }
        }
    }

    fn lint(&self, id: CheckRunId, files: Option<Vec<String>>) -> RunState {
        let output = match files.as_deref() {
            Some([]) => {
                info!("no changed files to lint");
                LintOutput::empty()
            }
            files => self.linter.run(files).unwrap_or_else(|err| {
                error!(linter = %self.config.linter, error = %err, "could not start linter");
                LintOutput::unavailable()
            }),
        };
        info!(exit_code = output.exit_code, "linter finished");
        RunState::Linted { id, output }
    }

    fn report(&self, id: CheckRunId, output: LintOutput) -> RunState {
        match report::build_output(&output.stdout, output.exit_code) {
            Ok(payload) => RunState::Reported {
                id,
                payload,
                exit_code: output.exit_code,
            },
            Err(err) => {
                error!(error = %err, "linter output could not be parsed");
                let reason = match &err {
                    CheckError::MalformedReport(reason) => reason.clone(),
                    other => other.to_string(),
                };
                let payload = report::parse_failure_output(&reason);
                RunState::AbortedAfterOpen {
                    exit_code: output.exit_code,
                    closed_remotely: self.close(id, &payload),
                }
            }
        }
    }

    /// A failed close is logged but never changes the exit status.
    fn close(&self, id: CheckRunId, payload: &CheckRunOutput) -> bool {
        match self.check_runs.close(id, payload) {
            Ok(()) => {
                info!(
                    %id,
                    conclusion = ?payload.conclusion,
                    annotations = payload.annotations.len(),
                    "check run closed"
                );
                true
            }
            Err(err) => {
                warn!(%id, error = %err, "could not close check run; it may stay in progress");
                false
            }
        }
    }
}
