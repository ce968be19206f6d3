//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use reaper_cluster::{Cluster, ClusterError};
use reaper_core::{ResourceInstance, ResourceKind};
use reaper_tools::{CommandOutput, ImperativeDelete, ToolError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared call log, in call order.
pub type Calls = Arc<Mutex<Vec<String>>>;

pub struct FakeCluster {
    pub namespace: String,
    pub instances: Vec<ResourceInstance>,
    pub calls: Calls,
    pub fail_list: bool,
    pub fail_jobs_for: Option<String>,
}

impl FakeCluster {
    pub fn new(instances: Vec<ResourceInstance>, calls: Calls) -> Self {
        Self {
            namespace: "jx".to_string(),
            instances,
            calls,
            fail_list: false,
            fail_jobs_for: None,
        }
    }
}

#[async_trait]
impl Cluster for FakeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list_resources(
        &self,
        kind: &ResourceKind,
        selector: &str,
    ) -> reaper_cluster::Result<Vec<ResourceInstance>> {
        self.calls.lock().unwrap().push(format!("list {} {}", kind.plural, selector));
        if self.fail_list {
            return Err(ClusterError::Other("connection refused".to_string()));
        }
        Ok(self.instances.clone())
    }

    async fn delete_active_jobs(&self, owner: &str) -> reaper_cluster::Result<Vec<String>> {
        self.calls.lock().unwrap().push(format!("jobs {}", owner));
        if self.fail_jobs_for.as_deref() == Some(owner) {
            return Err(ClusterError::Other("jobs.batch is forbidden".to_string()));
        }
        Ok(vec![format!("{}-apply", owner)])
    }
}

pub struct FakeKubectl {
    pub calls: Calls,
    pub fail_for: Option<String>,
}

impl FakeKubectl {
    pub fn new(calls: Calls) -> Self {
        Self { calls, fail_for: None }
    }
}

#[async_trait]
impl ImperativeDelete for FakeKubectl {
    async fn delete(&self, kind: &str, name: &str) -> reaper_tools::Result<CommandOutput> {
        self.calls.lock().unwrap().push(format!("delete {} {}", kind, name));
        let failed = self.fail_for.as_deref() == Some(name);
        let output = CommandOutput {
            exit_code: if failed { 1 } else { 0 },
            stdout: String::new(),
            stderr: if failed {
                "Error from server (Forbidden)".to_string()
            } else {
                String::new()
            },
            duration: Duration::ZERO,
        };
        if failed {
            return Err(ToolError::Failed {
                command: format!("kubectl delete {} {}", kind, name),
                output,
            });
        }
        Ok(output)
    }
}

pub fn calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(calls: &Calls) -> Vec<String> {
    calls.lock().unwrap().clone()
}
