use crate::error::{CheckError, Result};
use crate::types::config::{
    ChangeFilter, CheckFileConfig, Repository, RunConfig, Token, DEFAULT_API_URL, DEFAULT_BASE_REF,
    DEFAULT_CHECK_NAME, DEFAULT_LINTER, MAX_ANNOTATIONS_PER_REQUEST,
};
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "rubocop-check.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".rubocop-check/local.toml";

/// Command-line overrides that sit between the config file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub linter: Option<String>,
    pub linter_args: Vec<String>,
    pub git: Option<String>,
}

pub fn load_config(root: &Path, overrides: &Overrides) -> Result<RunConfig> {
    let file = load_file_config(root, overrides.config_path.as_deref())?;
    resolve(file, overrides, |key| std::env::var(key).ok())
}

pub(crate) fn load_file_config(root: &Path, explicit: Option<&Path>) -> Result<CheckFileConfig> {
    let repo_path = match explicit {
        Some(path) if !path.exists() => {
            return Err(CheckError::Config(format!(
                "config file not found: {}",
                path.display()
            )))
        }
        Some(path) => path.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let mut merged = Value::Table(Map::new());
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: CheckFileConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| CheckError::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Truthy values for boolean-like inputs: true/yes/on/1 and the empty string.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "true" | "yes" | "on" | "1"
    )
}

pub(crate) fn resolve<F>(file: CheckFileConfig, overrides: &Overrides, env: F) -> Result<RunConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        env(key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| CheckError::Config(format!("{key} must be set")))
    };

    let repository = Repository::parse(&required("GITHUB_REPOSITORY")?)?;
    let commit_sha = required("GITHUB_SHA")?.trim().to_string();
    let token = Token::new(required("GITHUB_TOKEN")?);

    let changes_only = match env("INPUT_CHANGES_ONLY") {
        Some(flag) => is_truthy(&flag),
        None => file.changes_only.unwrap_or(false),
    };
    let changes = changes_only.then(|| ChangeFilter {
        base_ref: non_empty(env("INPUT_BASE_REF"))
            .or(file.base_ref.clone())
            .or_else(|| non_empty(env("GITHUB_BASE_REF")).map(|branch| format!("origin/{branch}")))
            .unwrap_or_else(|| DEFAULT_BASE_REF.to_string()),
        head_ref: non_empty(env("INPUT_HEAD_REF"))
            .or(file.head_ref.clone())
            .unwrap_or_else(|| commit_sha.clone()),
    });

    let mut linter_args = file.linter_args;
    linter_args.extend(overrides.linter_args.iter().cloned());

    Ok(RunConfig {
        check_name: file.name.unwrap_or_else(|| DEFAULT_CHECK_NAME.to_string()),
        api_url: non_empty(env("GITHUB_API_URL"))
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        repository,
        commit_sha,
        token,
        linter: overrides
            .linter
            .clone()
            .or(file.linter)
            .unwrap_or_else(|| DEFAULT_LINTER.to_string()),
        linter_args,
        git: overrides.git.clone().unwrap_or_else(|| "git".to_string()),
        changes,
        max_annotations_per_request: file
            .max_annotations_per_request
            .unwrap_or(MAX_ANNOTATIONS_PER_REQUEST),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| CheckError::Config(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
