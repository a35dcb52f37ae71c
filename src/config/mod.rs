// src/config/mod.rs

//! Project file loading and validation.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a project file from disk.
//! - [`validate`] checks dependencies and acyclicity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_project_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigSection, ProjectFile, RawProjectFile, ResourceConfig};
pub use validate::validate_project;
