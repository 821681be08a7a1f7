use crate::error::CheckError;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_CHECK_NAME: &str = "Rubocop";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_LINTER: &str = "rubocop";
pub const DEFAULT_BASE_REF: &str = "origin/master";
pub const MAX_ANNOTATIONS_PER_REQUEST: usize = 50;

/// Optional settings read from `rubocop-check.toml` and its local override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckFileConfig {
    pub name: Option<String>,
    pub api_url: Option<String>,
    pub linter: Option<String>,
    #[serde(default)]
    pub linter_args: Vec<String>,
    pub changes_only: Option<bool>,
    pub base_ref: Option<String>,
    pub head_ref: Option<String>,
    pub max_annotations_per_request: Option<usize>,
}

impl CheckFileConfig {
    pub fn validate(&self) -> Result<(), CheckError> {
        if let Some(limit) = self.max_annotations_per_request {
            if !(1..=MAX_ANNOTATIONS_PER_REQUEST).contains(&limit) {
                return Err(CheckError::Config(format!(
                    "max_annotations_per_request must be between 1 and {MAX_ANNOTATIONS_PER_REQUEST} (found {limit})"
                )));
            }
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(CheckError::Config("name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn parse(slug: &str) -> Result<Self, CheckError> {
        let invalid = || CheckError::Config(format!("GITHUB_REPOSITORY must be owner/repo (found {slug:?})"));
        let (owner, name) = slug.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Bearer credential. Kept out of `Debug` output so it never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub base_ref: String,
    pub head_ref: String,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub check_name: String,
    pub api_url: String,
    pub repository: Repository,
    pub commit_sha: String,
    pub token: Token,
    pub linter: String,
    pub linter_args: Vec<String>,
    pub git: String,
    /// `None` lints the whole tree.
    pub changes: Option<ChangeFilter>,
    pub max_annotations_per_request: usize,
}
