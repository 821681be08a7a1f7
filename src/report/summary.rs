use crate::types::annotation::Conclusion;
use crate::types::report::Totals;

pub const CHECK_TITLE: &str = "Rubocop";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub conclusion: Conclusion,
    pub title: String,
    pub summary: String,
}

/// The verdict follows the linter's exit status literally, not the offense count.
pub fn conclusion_for(exit_code: i32) -> Conclusion {
    if exit_code == 0 {
        Conclusion::Success
    } else {
        Conclusion::Failure
    }
}

pub fn summarize(totals: &Totals, exit_code: i32) -> Summary {
    Summary {
        conclusion: conclusion_for(exit_code),
        title: CHECK_TITLE.to_string(),
        summary: format!(
            "Found {} offense(s) in {} inspected file(s).",
            totals.offense_count, totals.inspected_file_count
        ),
    }
}

pub fn parse_failure(reason: &str) -> Summary {
    Summary {
        conclusion: Conclusion::Failure,
        title: CHECK_TITLE.to_string(),
        summary: format!("Rubocop output could not be parsed: {reason}"),
    }
}
