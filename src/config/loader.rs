// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a project file from a given path and return the raw `RawProjectFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Parse a project file from TOML text.
pub fn load_from_str(contents: &str) -> Result<RawProjectFile> {
    let project: RawProjectFile = toml::from_str(contents)?;
    Ok(project)
}

/// Load a project file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for unknown or self `after` references, DAG cycles and global
///   config sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    ProjectFile::try_from(raw)
}

/// Default project file location: `Seedrun.toml` in the current directory.
pub fn default_project_path() -> PathBuf {
    PathBuf::from("Seedrun.toml")
}
