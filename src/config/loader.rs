// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw `RawPlanFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (dependency correctness, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Parse plan file contents without validating them.
pub fn parse_str(contents: &str) -> Result<RawPlanFile> {
    let plan: RawPlanFile = toml::from_str(contents)?;
    Ok(plan)
}

/// Load a plan file from path and validate it.
///
/// - Reads TOML.
/// - Applies `[config]` defaults (handled by `serde`).
/// - Checks for:
///   - duplicate or empty task ids,
///   - unknown `after` references,
///   - dependency cycles, self references included,
///   - `[config]` sanity (`max_concurrent`, `timeout_ms`).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw_plan = load_from_path(&path)?;
    let plan = PlanFile::try_from(raw_plan)?;
    Ok(plan)
}

/// Default plan path: `Taskwave.toml` in the current working directory.
pub fn default_plan_path() -> PathBuf {
    PathBuf::from("Taskwave.toml")
}
