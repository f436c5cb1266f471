//! JSON inputs for the CLI.
//!
//! # Responsibility
//! - Read task and settings files from disk.
//! - Parse the `--now` override.

use chrono::NaiveDateTime;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use vaultplan_core::{PlannerSettings, TaskRecord, TaskSource, TaskSourceError};

#[derive(Debug)]
pub enum CliError {
    Read { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    InvalidNow(String),
    Planner(vaultplan_core::PlannerServiceError),
    Logging(vaultplan_core::LoggingError),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "`{}` is not valid JSON: {source}", path.display())
            }
            Self::InvalidNow(value) => write!(
                f,
                "invalid --now `{value}`; expected YYYY-MM-DDTHH:MM[:SS]"
            ),
            Self::Planner(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "cannot serialize output: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidNow(_) => None,
            Self::Planner(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<vaultplan_core::PlannerServiceError> for CliError {
    fn from(value: vaultplan_core::PlannerServiceError) -> Self {
        Self::Planner(value)
    }
}

impl From<vaultplan_core::LoggingError> for CliError {
    fn from(value: vaultplan_core::LoggingError) -> Self {
        Self::Logging(value)
    }
}

pub fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings from `path`, or defaults when absent.
pub fn load_settings(path: Option<&Path>) -> Result<(PlannerSettings, Vec<String>), CliError> {
    match path {
        Some(path) => Ok(PlannerSettings::from_json_value(&read_json(path)?)),
        None => Ok((PlannerSettings::default(), Vec::new())),
    }
}

/// Task records stored as a JSON array, or as `{"tasks": [...]}`.
pub struct JsonFileTaskSource {
    path: PathBuf,
}

impl JsonFileTaskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TaskSource for JsonFileTaskSource {
    fn load_tasks(&self) -> Result<Vec<TaskRecord>, TaskSourceError> {
        let value = read_json(&self.path).map_err(|err| match err {
            CliError::Json { .. } => TaskSourceError::InvalidData(err.to_string()),
            other => TaskSourceError::Unavailable(other.to_string()),
        })?;
        let list = match value {
            Value::Object(mut object) => object.remove("tasks").unwrap_or(Value::Null),
            other => other,
        };
        serde_json::from_value(list).map_err(|err| {
            TaskSourceError::InvalidData(format!("`{}`: {err}", self.path.display()))
        })
    }
}

const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_now(value: &str) -> Result<NaiveDateTime, CliError> {
    let trimmed = value.trim();
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| CliError::InvalidNow(value.to_string()))
}
