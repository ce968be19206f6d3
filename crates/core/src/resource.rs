//! Resource model - the cluster objects the collector looks at.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::Time;

/// Label that opts a resource out of garbage collection.
///
/// Any non-empty value keeps the resource.
pub const KEEP_LABEL: &str = "keep";

/// Label the Terraform operator puts on the Jobs it spawns for a resource.
pub const JOB_OWNER_LABEL: &str = "terraforms.tf.isaaguilar.com/resourceName";

/// Label mapping of a resource.
pub type Labels = BTreeMap<String, String>;

/// A custom resource kind, mapped statically to its API coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// API group
    pub group: &'static str,

    /// API version
    pub version: &'static str,

    /// Kind name, as accepted by `kubectl delete`
    pub kind: &'static str,

    /// Plural resource identifier used in API paths
    pub plural: &'static str,
}

impl ResourceKind {
    /// Terraform resources managed by the Terraform operator.
    pub const TERRAFORM: ResourceKind = ResourceKind {
        group: "tf.isaaguilar.com",
        version: "v1alpha1",
        kind: "Terraform",
        plural: "terraforms",
    };

    /// `group/version` string.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind)
    }
}

/// One instance of a provisioning custom resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInstance {
    /// Name, unique within namespace and kind
    pub name: String,

    /// When the control plane created the object
    pub created_at: Time,

    /// Labels
    #[serde(default)]
    pub labels: Labels,
}

impl ResourceInstance {
    /// Create an instance with no labels.
    pub fn new(name: impl Into<String>, created_at: Time) -> Self {
        Self {
            name: name.into(),
            created_at,
            labels: Labels::new(),
        }
    }

    /// Add a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Look up a label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Whether the `keep` label is set to a non-empty value.
    pub fn is_kept(&self) -> bool {
        self.label(KEEP_LABEL).is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_terraform_kind_mapping() {
        let kind = ResourceKind::TERRAFORM;
        assert_eq!(kind.kind, "Terraform");
        assert_eq!(kind.plural, "terraforms");
        assert_eq!(kind.api_version(), "tf.isaaguilar.com/v1alpha1");
        assert_eq!(kind.to_string(), "Terraform");
    }

    #[test]
    fn test_core_group_api_version() {
        let kind = ResourceKind {
            group: "",
            version: "v1",
            kind: "ConfigMap",
            plural: "configmaps",
        };
        assert_eq!(kind.api_version(), "v1");
    }

    #[test]
    fn test_keep_label() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let plain = ResourceInstance::new("tf-pr-1", created);
        assert!(!plain.is_kept());

        let empty = plain.clone().with_label(KEEP_LABEL, "");
        assert!(!empty.is_kept());

        let kept = plain.with_label(KEEP_LABEL, "true");
        assert!(kept.is_kept());
    }

    #[test]
    fn test_instance_deserialize_without_labels() {
        let json = r#"{"name":"tf-pr-3","created_at":"2024-01-01T00:00:00Z"}"#;
        let instance: ResourceInstance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.name, "tf-pr-3");
        assert!(instance.labels.is_empty());
    }
}
