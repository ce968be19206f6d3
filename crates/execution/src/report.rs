//! Results of a collection pass.

use reaper_core::{Outcome, Time};
use serde::Serialize;

/// What happened to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceReport {
    /// Resource name
    pub name: String,

    /// Creation timestamp of the resource
    pub created_at: Time,

    /// Outcome
    pub outcome: Outcome,
}

/// Results from a single garbage collection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Namespace collected
    pub namespace: String,

    /// Resources created at or after this instant were kept
    pub cutoff: Time,

    /// Per-resource outcomes, in enumeration order
    pub instances: Vec<InstanceReport>,
}

impl RunReport {
    /// Empty report for a pass.
    pub fn new(namespace: impl Into<String>, cutoff: Time) -> Self {
        Self {
            namespace: namespace.into(),
            cutoff,
            instances: Vec::new(),
        }
    }

    /// Record an outcome.
    pub fn record(&mut self, name: impl Into<String>, created_at: Time, outcome: Outcome) {
        self.instances.push(InstanceReport {
            name: name.into(),
            created_at,
            outcome,
        });
    }

    /// Number of resources skipped because of the `keep` label.
    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedKept))
    }

    /// Number of resources skipped because they are too young.
    pub fn too_young(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedTooYoung))
    }

    /// Number of resources deleted.
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Deleted { .. }))
    }

    /// Names of all jobs torn down during the pass.
    pub fn deleted_jobs(&self) -> Vec<&str> {
        self.instances
            .iter()
            .filter_map(|i| match &i.outcome {
                Outcome::Deleted { jobs } => Some(jobs),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Check if anything was deleted.
    pub fn has_deletions(&self) -> bool {
        self.deleted() > 0
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.instances.iter().filter(|i| pred(&i.outcome)).count()
    }
}
