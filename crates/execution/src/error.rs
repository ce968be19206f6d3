//! Errors that end a collection pass.

use reaper_cluster::ClusterError;
use reaper_tools::ToolError;

/// Result type for the engine.
pub type Result<T> = std::result::Result<T, GcError>;

/// Fatal errors of a garbage collection pass.
///
/// Every variant stops the pass; there is no recoverable category.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// Client or namespace could not be resolved
    #[error("failed to validate setup: {reason}")]
    Setup {
        /// What was missing
        reason: String,
        /// Underlying client error, if any
        #[source]
        source: Option<ClusterError>,
    },

    /// Listing the resources failed
    #[error("failed to list {kind} resources in namespace {namespace} with selector {selector:?}")]
    Query {
        /// Kind being listed
        kind: String,
        /// Namespace queried
        namespace: String,
        /// Label selector used
        selector: String,
        /// Underlying error
        #[source]
        source: ClusterError,
    },

    /// Tearing down the active jobs of a resource failed; the resource was left alone
    #[error("failed to delete active Jobs of {kind} {name} in namespace {namespace}")]
    DependencyDeletion {
        /// Kind of the owning resource
        kind: String,
        /// Namespace of the resource
        namespace: String,
        /// Name of the owning resource
        name: String,
        /// Underlying error
        #[source]
        source: ClusterError,
    },

    /// Deleting the resource itself failed
    #[error("failed to delete {kind} {name} in namespace {namespace}")]
    PrimaryDeletion {
        /// Kind of the resource
        kind: String,
        /// Namespace of the resource
        namespace: String,
        /// Name of the resource
        name: String,
        /// Underlying error, with command output when the command ran
        #[source]
        source: ToolError,
    },
}

impl GcError {
    /// Setup failure caused by the cluster client.
    pub fn client(source: ClusterError) -> Self {
        GcError::Setup {
            reason: "failed to create kube client".to_string(),
            source: Some(source),
        }
    }

    /// Name of the resource the error is about, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            GcError::DependencyDeletion { name, .. } | GcError::PrimaryDeletion { name, .. } => {
                Some(name)
            }
            GcError::Setup { .. } | GcError::Query { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_setup_without_source() {
        let err = GcError::Setup {
            reason: "no namespace".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "failed to validate setup: no namespace");
        assert!(err.source().is_none());
        assert_eq!(err.resource(), None);
    }

    #[test]
    fn test_dependency_error_context() {
        let err = GcError::DependencyDeletion {
            kind: "Terraform".to_string(),
            namespace: "jx".to_string(),
            name: "tf-pr-42".to_string(),
            source: ClusterError::Other("forbidden".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to delete active Jobs of Terraform tf-pr-42 in namespace jx"
        );
        assert_eq!(err.source().map(|s| s.to_string()), Some("forbidden".to_string()));
        assert_eq!(err.resource(), Some("tf-pr-42"));
    }

    #[test]
    fn test_query_error_context() {
        let err = GcError::Query {
            kind: "Terraform".to_string(),
            namespace: "jx".to_string(),
            selector: "kind=terraform-test".to_string(),
            source: ClusterError::Other("connection refused".to_string()),
        };
        assert!(err.to_string().contains("\"kind=terraform-test\""));
        assert_eq!(err.resource(), None);
    }

    #[test]
    fn test_client_failure_is_setup_with_source() {
        let err = GcError::client(ClusterError::Other("no kubeconfig found".to_string()));
        assert!(matches!(err, GcError::Setup { source: Some(_), .. }));
        assert_eq!(err.to_string(), "failed to validate setup: failed to create kube client");
        assert_eq!(err.source().map(|s| s.to_string()), Some("no kubeconfig found".to_string()));
        assert_eq!(err.resource(), None);
    }
}
