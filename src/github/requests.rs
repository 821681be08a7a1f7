use crate::types::annotation::{Annotation, CheckRunOutput, Conclusion};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateCheckRun<'a> {
    pub name: &'a str,
    pub status: &'static str,
    pub head_sha: &'a str,
    pub started_at: String,
}

impl<'a> CreateCheckRun<'a> {
    pub fn in_progress(name: &'a str, head_sha: &'a str, started_at: DateTime<Utc>) -> Self {
        Self {
            name,
            status: "in_progress",
            head_sha,
            started_at: timestamp(started_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedCheckRun {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct Output<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub annotations: &'a [Annotation],
}

#[derive(Debug, Serialize)]
pub struct UpdateCheckRun<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Conclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub output: Output<'a>,
}

/// Split a close into PATCH bodies of at most `limit` annotations each.
///
/// Only the last body carries the conclusion, so the run completes after every
/// annotation has been delivered. An empty annotation set still yields one body.
pub fn close_requests<'a>(
    output: &'a CheckRunOutput,
    limit: usize,
    completed_at: DateTime<Utc>,
) -> Vec<UpdateCheckRun<'a>> {
    let limit = limit.max(1);
    let chunks: Vec<&[Annotation]> = if output.annotations.is_empty() {
        vec![&output.annotations[..]]
    } else {
        output.annotations.chunks(limit).collect()
    };
    let last = chunks.len() - 1;

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, annotations)| {
            let is_last = index == last;
            UpdateCheckRun {
                conclusion: is_last.then_some(output.conclusion),
                completed_at: is_last.then(|| timestamp(completed_at)),
                output: Output {
                    title: &output.title,
                    summary: &output.summary,
                    annotations,
                },
            }
        })
        .collect()
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
