use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use seedrun::errors::{Result, SeedrunError};
use seedrun::graph::ResourceNode;
use seedrun::results::Table;
use seedrun::runner::{
    AdapterResponse, AdapterSession, BoxFuture, ExecutionAdapter, Materialized,
};

#[derive(Debug, Default)]
struct FakeState {
    raises: HashMap<String, String>,
    rejects: HashMap<String, String>,
    panics: HashSet<String>,
    delays: HashMap<String, Duration>,
    tables: HashMap<String, Table>,
    executed: Vec<String>,
    sessions: usize,
    in_flight: usize,
    max_in_flight: usize,
}

/// A fake execution adapter that:
/// - records which nodes were executed, in start order
/// - counts sessions and tracks the peak number of concurrent executions
/// - scripts per-node outcomes (by resource name): raise an error, signal
///   failure in the response, panic, or succeed after an optional delay.
///
/// Clones share state, so a test can keep one handle and give the other to
/// the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct FakeAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executing `name` returns `Err(Adapter(message))`.
    pub fn raise(self, name: &str, message: &str) -> Self {
        self.with_state(|s| {
            s.raises.insert(name.to_string(), message.to_string());
        })
    }

    /// Executing `name` completes with a failed response.
    pub fn reject(self, name: &str, message: &str) -> Self {
        self.with_state(|s| {
            s.rejects.insert(name.to_string(), message.to_string());
        })
    }

    pub fn panic_on(self, name: &str) -> Self {
        self.with_state(|s| {
            s.panics.insert(name.to_string());
        })
    }

    pub fn delay(self, name: &str, ms: u64) -> Self {
        self.with_state(|s| {
            s.delays.insert(name.to_string(), Duration::from_millis(ms));
        })
    }

    /// Table returned for `name`. Nodes without one get a single-row table.
    pub fn table(self, name: &str, table: Table) -> Self {
        self.with_state(|s| {
            s.tables.insert(name.to_string(), table);
        })
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().unwrap().sessions
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    fn with_state(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }
}

impl ExecutionAdapter for FakeAdapter {
    fn name(&self) -> &str {
        "fake"
    }

    fn open_session(&self) -> Result<Box<dyn AdapterSession>> {
        self.state.lock().unwrap().sessions += 1;
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<FakeState>>,
}

impl AdapterSession for FakeSession {
    fn execute<'a>(&'a mut self, node: &'a ResourceNode) -> BoxFuture<'a, Result<Materialized>> {
        Box::pin(async move {
            let name = node.name.clone();
            let delay = {
                let mut s = self.state.lock().unwrap();
                s.executed.push(name.clone());
                s.in_flight += 1;
                s.max_in_flight = s.max_in_flight.max(s.in_flight);
                s.delays.get(&name).copied()
            };

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let (raise, reject, panic, table) = {
                let mut s = self.state.lock().unwrap();
                s.in_flight -= 1;
                (
                    s.raises.get(&name).cloned(),
                    s.rejects.get(&name).cloned(),
                    s.panics.contains(&name),
                    s.tables.get(&name).cloned(),
                )
            };

            if panic {
                panic!("fake adapter panic for {name}");
            }
            if let Some(message) = raise {
                return Err(SeedrunError::Adapter(message));
            }
            if let Some(message) = reject {
                return Ok(Materialized {
                    response: AdapterResponse::failed(message),
                    table: None,
                });
            }

            let table = table.unwrap_or_else(|| {
                Table::new(vec!["id".to_string()], vec![vec!["1".to_string()]])
            });
            let rows = table.row_count() as u64;
            Ok(Materialized {
                response: AdapterResponse::ok(format!("INSERT {rows}"), Some(rows)),
                table: Some(table),
            })
        })
    }
}
