pub mod annotations;
pub mod parse;
pub mod summary;

use crate::error::Result;
use crate::types::annotation::CheckRunOutput;
use tracing::debug;

/// Build the close payload from raw linter output and its exit status.
pub fn build_output(raw: &str, exit_code: i32) -> Result<CheckRunOutput> {
    let report = parse::parse_report(raw)?;
    debug!(
        files = report.per_file.len(),
        offenses = report.offense_count(),
        "parsed linter report"
    );
    let annotations = annotations::annotate(&report);
    let summary = summary::summarize(&report.totals, exit_code);
    Ok(CheckRunOutput {
        conclusion: summary.conclusion,
        title: summary.title,
        summary: summary.summary,
        annotations,
    })
}

/// Payload for closing a run whose linter output could not be understood.
pub fn parse_failure_output(reason: &str) -> CheckRunOutput {
    let summary = summary::parse_failure(reason);
    CheckRunOutput {
        conclusion: summary.conclusion,
        title: summary.title,
        summary: summary.summary,
        annotations: Vec::new(),
    }
}
