use serde::Deserialize;

/// Linter severity taxonomy, as emitted in the `severity` field of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Refactor,
    Convention,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offense {
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: Option<u32>,
    pub end_column: Option<u32>,
    pub severity: Severity,
    pub message: String,
    pub rule_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    pub offenses: Vec<Offense>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub offense_count: u64,
    pub inspected_file_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LintReport {
    pub per_file: Vec<FileReport>,
    pub totals: Totals,
}

impl LintReport {
    pub fn offense_count(&self) -> usize {
        self.per_file.iter().map(|file| file.offenses.len()).sum()
    }
}
