use crate::types::annotation::{Annotation, AnnotationLevel};
use crate::types::report::{FileReport, LintReport, Offense, Severity};

/// Only `warning` stays a warning; every other severity fails the check.
pub fn annotation_level(severity: Severity) -> AnnotationLevel {
    match severity {
        Severity::Warning => AnnotationLevel::Warning,
        Severity::Info
        | Severity::Refactor
        | Severity::Convention
        | Severity::Error
        | Severity::Fatal => AnnotationLevel::Failure,
    }
}

pub fn to_annotation(path: &str, offense: &Offense) -> Annotation {
    let columns = offense
        .start_column
        .zip(offense.end_column)
        .filter(|_| offense.start_line == offense.end_line);
    Annotation {
        path: path.to_string(),
        start_line: offense.start_line,
        end_line: offense.end_line,
        annotation_level: annotation_level(offense.severity),
        title: offense.rule_id.clone(),
        message: offense.message.clone(),
        start_column: columns.map(|(start, _)| start),
        end_column: columns.map(|(_, end)| end),
    }
}

pub fn annotate_file(file: &FileReport) -> Vec<Annotation> {
    file.offenses
        .iter()
        .map(|offense| to_annotation(&file.path, offense))
        .collect()
}

/// File order as reported, then offense order within each file.
pub fn annotate(report: &LintReport) -> Vec<Annotation> {
    report.per_file.iter().flat_map(annotate_file).collect()
}
