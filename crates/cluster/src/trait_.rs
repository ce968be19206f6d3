//! Cluster trait abstraction.

use async_trait::async_trait;
use reaper_core::{ResourceInstance, ResourceKind};

/// Error type for cluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while talking to the control plane.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Object returned by the API is missing a required field
    #[error("Invalid {kind} object: {reason}")]
    Decode {
        /// Kind of the offending object
        kind: String,
        /// What was wrong with it
        reason: String,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Control plane operations the collector needs.
///
/// Implementations are bound to a single namespace.
#[async_trait]
pub trait Cluster: Send + Sync {
    /// Namespace this client operates in.
    fn namespace(&self) -> &str;

    /// List all resources of `kind` matching the label selector.
    ///
    /// A missing resource scope yields an empty list.
    async fn list_resources(
        &self,
        kind: &ResourceKind,
        selector: &str,
    ) -> Result<Vec<ResourceInstance>>;

    /// Delete the active jobs spawned for the resource named `owner`.
    ///
    /// Returns the names of the jobs that were deleted.
    async fn delete_active_jobs(&self, owner: &str) -> Result<Vec<String>>;
}
