pub mod client;
pub mod requests;

use crate::error::Result;
use crate::types::annotation::CheckRunOutput;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckRunId(pub u64);

impl fmt::Display for CheckRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one remote check run: opened once, closed once.
pub trait CheckRuns {
    fn create(&self, head_sha: &str, started_at: DateTime<Utc>) -> Result<CheckRunId>;

    fn close(&self, id: CheckRunId, output: &CheckRunOutput) -> Result<()>;
}
