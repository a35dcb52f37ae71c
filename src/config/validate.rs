// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::{Result, SeedrunError};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = SeedrunError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw.config, raw.resource))
    }
}

/// Run every semantic check on a raw project file.
pub fn validate_project(cfg: &RawProjectFile) -> Result<()> {
    validate_raw_project(cfg)
}

fn validate_raw_project(cfg: &RawProjectFile) -> Result<()> {
    ensure_has_resources(cfg)?;
    validate_global_config(cfg)?;
    validate_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_resources(cfg: &RawProjectFile) -> Result<()> {
    if cfg.resource.is_empty() {
        return Err(SeedrunError::ConfigError(
            "project must contain at least one [resource.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawProjectFile) -> Result<()> {
    if cfg.config.threads == 0 {
        return Err(SeedrunError::ConfigError(
            "[config].threads must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.config.schema.trim().is_empty() {
        return Err(SeedrunError::ConfigError(
            "[config].schema must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_dependencies(cfg: &RawProjectFile) -> Result<()> {
    for (name, res) in cfg.resource.iter() {
        for dep in res.after.iter() {
            if dep == name {
                return Err(SeedrunError::ConfigError(format!(
                    "resource '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.resource.contains_key(dep) {
                return Err(SeedrunError::ConfigError(format!(
                    "resource '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawProjectFile) -> Result<()> {
    // Edge direction: dep -> resource.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.resource.keys() {
        graph.add_node(name.as_str());
    }

    for (name, res) in cfg.resource.iter() {
        for dep in res.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SeedrunError::DagCycle(format!(
            "cycle detected in resource graph involving '{}'",
            cycle.node_id()
        ))),
    }
}
