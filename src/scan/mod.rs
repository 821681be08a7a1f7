pub mod git_diff;

use crate::error::Result;
use crate::types::config::ChangeFilter;
use std::collections::HashSet;

/// Seam over the external revision comparison so the resolver can be faked.
pub trait RevisionDiff {
    /// Raw stdout listing paths changed between `base` and `head`, NUL-separated
    /// and unquoted.
    fn changed_files(&self, base: &str, head: &str) -> Result<String>;
}

/// `None` means lint everything. Otherwise the changed paths, deduplicated in
/// first-seen order.
pub fn resolve_change_set<D: RevisionDiff + ?Sized>(
    diff: &D,
    filter: Option<&ChangeFilter>,
) -> Result<Option<Vec<String>>> {
    let Some(filter) = filter else {
        return Ok(None);
    };
    let stdout = diff.changed_files(&filter.base_ref, &filter.head_ref)?;
    Ok(Some(split_paths(&stdout)))
}

fn split_paths(stdout: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    stdout
        .split('\0')
        .filter(|path| !path.is_empty())
        .filter(|path| seen.insert(path.to_string()))
        .map(str::to_string)
        .collect()
}
