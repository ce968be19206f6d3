//! Cascading deletion: dependent jobs first, then the resource.

use crate::error::{GcError, Result};
use reaper_cluster::Cluster;
use reaper_core::ResourceKind;
use reaper_tools::ImperativeDelete;
use std::sync::Arc;
use tracing::{debug, info};

/// Deletes a resource after tearing down its active jobs.
#[derive(Clone)]
pub struct CascadingDeleter {
    cluster: Arc<dyn Cluster>,
    imperative: Arc<dyn ImperativeDelete>,
}

impl CascadingDeleter {
    /// Create a deleter.
    pub fn new(cluster: Arc<dyn Cluster>, imperative: Arc<dyn ImperativeDelete>) -> Self {
        Self { cluster, imperative }
    }

    /// Delete `name` of `kind`.
    ///
    /// The resource is never touched unless every active job was removed.
    /// Returns the names of the jobs that were deleted.
    pub async fn delete(&self, kind: &ResourceKind, name: &str) -> Result<Vec<String>> {
        let namespace = self.cluster.namespace();

        let jobs = self
            .cluster
            .delete_active_jobs(name)
            .await
            .map_err(|source| GcError::DependencyDeletion {
                kind: kind.kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;
        debug!(namespace, jobs = jobs.len(), "Deleted active Jobs for {} {}", kind, name);

        info!("deleting {} {}", kind, name);
        let output = self
            .imperative
            .delete(kind.kind, name)
            .await
            .map_err(|source| GcError::PrimaryDeletion {
                kind: kind.kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;
        debug!(
            stdout = %output.stdout.trim(),
            duration_ms = output.duration.as_millis() as u64,
            "kubectl delete finished"
        );

        Ok(jobs)
    }
}
