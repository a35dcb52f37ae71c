// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::ResourceType;

/// Project file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// threads = 4
/// fail_fast = false
///
/// [resource.raw_customers]
/// path = "seeds/raw_customers.csv"
///
/// [resource.customers]
/// type = "model"
/// after = ["raw_customers"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProjectFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All resources from `[resource.<name>]`, keyed by resource name.
    #[serde(default)]
    pub resource: BTreeMap<String, ResourceConfig>,
}

/// A project file that passed validation (see `config::validate`).
///
/// Only constructible through `TryFrom<RawProjectFile>`, so holders can rely
/// on dependencies being known and acyclic.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub config: ConfigSection,
    pub resource: BTreeMap<String, ResourceConfig>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        resource: BTreeMap<String, ResourceConfig>,
    ) -> Self {
        Self { config, resource }
    }

    /// Effective schema of a resource, falling back to `[config].schema`.
    pub fn schema_of<'a>(&'a self, res: &'a ResourceConfig) -> &'a str {
        res.schema.as_deref().unwrap_or(&self.config.schema)
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of resources executed at the same time.
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Stop scheduling new resources after the first error.
    ///
    /// Seeds default to continuing on error.
    #[serde(default)]
    pub fail_fast: bool,

    /// Namespace used when a resource does not set its own `schema`.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Directory (relative to the project file) where materialized seeds are
    /// written.
    #[serde(default = "default_target_dir")]
    pub target_dir: String,

    /// Where the state of the last run is written, relative to the project
    /// file.
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Field delimiter used by the local seed loader.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_threads() -> usize {
    1
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_target_dir() -> String {
    "target".to_string()
}

fn default_state_path() -> String {
    "target/seedrun_state.toml".to_string()
}

fn default_delimiter() -> char {
    ','
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            fail_fast: false,
            schema: default_schema(),
            target_dir: default_target_dir(),
            state_path: default_state_path(),
            delimiter: default_delimiter(),
        }
    }
}

/// `[resource.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResourceConfig {
    /// Resource type; defaults to `"seed"`.
    #[serde(default, rename = "type")]
    pub resource_type: ResourceType,

    /// Optional namespace override.
    #[serde(default)]
    pub schema: Option<String>,

    /// Relation name in the target; defaults to the resource name.
    #[serde(default)]
    pub alias: Option<String>,

    /// Source file, relative to the project file. Seeds default to
    /// `seeds/<name>.csv`.
    #[serde(default)]
    pub path: Option<String>,

    /// Resources this one depends on.
    #[serde(default)]
    pub after: Vec<String>,
}

impl ResourceConfig {
    /// Effective source path for a resource called `name`.
    pub fn effective_path(&self, name: &str) -> Option<String> {
        match (&self.path, self.resource_type) {
            (Some(p), _) => Some(p.clone()),
            (None, ResourceType::Seed) => Some(format!("seeds/{name}.csv")),
            (None, _) => None,
        }
    }
}
