// src/runner/local.rs

//! File-backed adapter used by the `seedrun` binary.
//!
//! "Loading" a seed means reading its delimited source file and writing the
//! parsed table to `<target_dir>/<schema>/<alias>.csv`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::errors::{Result, SeedrunError};
use crate::fs::FileSystem;
use crate::graph::ResourceNode;
use crate::results::Table;
use crate::runner::adapter::{
    AdapterResponse, AdapterSession, BoxFuture, ExecutionAdapter, Materialized,
};

#[derive(Debug)]
pub struct LocalSeedAdapter {
    fs: Arc<dyn FileSystem>,
    target_dir: PathBuf,
    delimiter: char,
    sessions_opened: AtomicUsize,
}

impl LocalSeedAdapter {
    pub fn new(fs: Arc<dyn FileSystem>, target_dir: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            fs,
            target_dir: target_dir.into(),
            delimiter,
            sessions_opened: AtomicUsize::new(0),
        }
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }
}

impl ExecutionAdapter for LocalSeedAdapter {
    fn name(&self) -> &str {
        "local"
    }

    fn open_session(&self) -> Result<Box<dyn AdapterSession>> {
        let id = self.sessions_opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(session = id, "opening local adapter session");
        Ok(Box::new(LocalSession {
            id,
            fs: Arc::clone(&self.fs),
            target_dir: self.target_dir.clone(),
            delimiter: self.delimiter,
        }))
    }
}

struct LocalSession {
    id: usize,
    fs: Arc<dyn FileSystem>,
    target_dir: PathBuf,
    delimiter: char,
}

impl LocalSession {
    fn load(&self, node: &ResourceNode) -> Result<Materialized> {
        let source = node.path.as_ref().ok_or_else(|| SeedrunError::Execution {
            node: node.unique_id.clone(),
            message: format!("{} has no source file", node.unique_id),
        })?;

        let text = self.fs.read_to_string(source)?;
        let table = Table::from_delimited(&text, self.delimiter);
        if table.columns.is_empty() {
            return Err(SeedrunError::Execution {
                node: node.unique_id.clone(),
                message: format!("seed file {:?} has no header row", source),
            });
        }

        let target = self
            .target_dir
            .join(&node.schema)
            .join(format!("{}.csv", node.alias));
        self.fs
            .write(&target, table.to_delimited(self.delimiter).as_bytes())?;

        let rows = table.row_count() as u64;
        info!(
            node = %node.unique_id,
            session = self.id,
            rows,
            target = ?target,
            "seed materialized"
        );

        Ok(Materialized {
            response: AdapterResponse::ok(format!("INSERT {rows}"), Some(rows)),
            table: Some(table),
        })
    }
}

impl AdapterSession for LocalSession {
    fn execute<'a>(&'a mut self, node: &'a ResourceNode) -> BoxFuture<'a, Result<Materialized>> {
        Box::pin(async move { self.load(node) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::types::ResourceType;
    use std::path::Path;

    fn node(path: Option<&str>) -> ResourceNode {
        let n = ResourceNode::new(ResourceType::Seed, "raw_orders", "main").with_alias("orders");
        match path {
            Some(p) => n.with_path(p),
            None => n,
        }
    }

    #[tokio::test]
    async fn loads_and_materializes_seed() {
        let fs = MockFileSystem::new();
        fs.add_file("seeds/raw_orders.csv", "id,amount\n1,10\n2,20\n");
        let adapter = LocalSeedAdapter::new(Arc::new(fs.clone()), "target", ',');

        let mut session = adapter.open_session().unwrap();
        let out = session.execute(&node(Some("seeds/raw_orders.csv"))).await.unwrap();

        assert_eq!(out.response, AdapterResponse::ok("INSERT 2", Some(2)));
        assert_eq!(out.table.map(|t| t.row_count()), Some(2));
        assert_eq!(
            fs.read_to_string(Path::new("target/main/orders.csv")).unwrap(),
            "id,amount\n1,10\n2,20\n"
        );
        assert_eq!(adapter.sessions_opened(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let adapter = LocalSeedAdapter::new(Arc::new(MockFileSystem::new()), "target", ',');
        let mut session = adapter.open_session().unwrap();
        assert!(session.execute(&node(Some("seeds/nope.csv"))).await.is_err());
        assert!(session.execute(&node(None)).await.is_err());
    }

    #[tokio::test]
    async fn empty_file_has_no_header() {
        let fs = MockFileSystem::new();
        fs.add_file("seeds/empty.csv", "");
        let adapter = LocalSeedAdapter::new(Arc::new(fs), "target", ',');
        let mut session = adapter.open_session().unwrap();
        let err = session.execute(&node(Some("seeds/empty.csv"))).await.unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }
}
