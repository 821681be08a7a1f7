use crate::error::{CheckError, Result};
use crate::types::report::{FileReport, LintReport, Offense, Severity, Totals};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawReport {
    files: Vec<RawFile>,
    summary: RawSummary,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    offense_count: u64,
    inspected_file_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    path: String,
    offenses: Vec<RawOffense>,
}

#[derive(Debug, Deserialize)]
struct RawOffense {
    location: RawLocation,
    severity: Severity,
    message: String,
    cop_name: String,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    start_line: u32,
    last_line: u32,
    start_column: Option<u32>,
    last_column: Option<u32>,
}

/// Strictly decode the linter's JSON report. Missing required fields are an
/// error, never defaulted.
pub fn parse_report(raw: &str) -> Result<LintReport> {
    let decoded: RawReport =
        serde_json::from_str(raw).map_err(|e| CheckError::MalformedReport(e.to_string()))?;

    let per_file = decoded
        .files
        .into_iter()
        .map(|file| {
            let offenses = file
                .offenses
                .into_iter()
                .map(|offense| normalize_offense(&file.path, offense))
                .collect::<Result<Vec<_>>>()?;
            Ok(FileReport {
                path: file.path,
                offenses,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LintReport {
        per_file,
        totals: Totals {
            offense_count: decoded.summary.offense_count,
            inspected_file_count: decoded.summary.inspected_file_count,
        },
    })
}

fn normalize_offense(path: &str, offense: RawOffense) -> Result<Offense> {
    let location = offense.location;
    if location.start_line == 0 || location.last_line < location.start_line {
        return Err(CheckError::MalformedReport(format!(
            "{path}: invalid line range {}..{} for {}",
            location.start_line, location.last_line, offense.cop_name
        )));
    }
    if location.start_column == Some(0) || location.last_column == Some(0) {
        return Err(CheckError::MalformedReport(format!(
            "{path}: columns are 1-based for {}",
            offense.cop_name
        )));
    }

    Ok(Offense {
        start_line: location.start_line,
        end_line: location.last_line,
        start_column: location.start_column,
        end_column: location.last_column,
        severity: offense.severity,
        message: offense.message,
        rule_id: offense.cop_name,
    })
}
