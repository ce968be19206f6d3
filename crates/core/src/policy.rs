//! Retention policy - decides which resources are due for collection.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::resource::ResourceInstance;
use crate::Time;

/// Selector used when none is given: Terraform resources created by tests.
pub const DEFAULT_SELECTOR: &str = "kind=terraform-test";

/// Maximum age used when none is given.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Retention policy for a single collection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Label selector restricting which resources are considered
    pub selector: String,

    /// Resources older than this are eligible for deletion
    pub max_age: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl RetentionPolicy {
    /// Create a policy.
    pub fn new(selector: impl Into<String>, max_age: Duration) -> Self {
        Self {
            selector: selector.into(),
            max_age,
        }
    }

    /// Creation instant a resource must be strictly before to be collected.
    pub fn cutoff(&self, now: Time) -> Time {
        cutoff(self.max_age, now)
    }

    /// Evaluate a resource against this policy.
    pub fn evaluate(&self, instance: &ResourceInstance, now: Time) -> Decision {
        evaluate(instance, self.max_age, now)
    }
}

/// Retention decision for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Opted out through the `keep` label
    Kept,
    /// Not old enough yet
    TooYoung,
    /// Due for deletion
    Eligible,
}

/// What happened to a resource during a pass.
///
/// Failures are not an outcome: they end the pass as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Skipped because of the `keep` label
    SkippedKept,
    /// Skipped because it is younger than the maximum age
    SkippedTooYoung,
    /// Dependent jobs and the resource itself were deleted
    Deleted {
        /// Names of the active jobs removed before the resource
        jobs: Vec<String>,
    },
}

fn cutoff(max_age: Duration, now: Time) -> Time {
    chrono::Duration::from_std(max_age)
        .ok()
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC)
}

/// Decide whether a resource should be kept or collected.
///
/// A resource created exactly at the cutoff is still too young: only
/// resources created strictly before `now - max_age` are eligible.
pub fn evaluate(instance: &ResourceInstance, max_age: Duration, now: Time) -> Decision {
    if instance.is_kept() {
        return Decision::Kept;
    }

    if instance.created_at >= cutoff(max_age, now) {
        return Decision::TooYoung;
    }

    Decision::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KEEP_LABEL;
    use chrono::{TimeZone, Utc};

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn created_ago(name: &str, ago: Duration) -> ResourceInstance {
        let created = now() - chrono::Duration::from_std(ago).unwrap();
        ResourceInstance::new(name, created).with_label("kind", "terraform-test")
    }

    #[test]
    fn test_default_policy() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.selector, "kind=terraform-test");
        assert_eq!(policy.max_age, 2 * HOUR);
    }

    #[test]
    fn test_keep_label_wins_over_age() {
        let instance = created_ago("tf-pr-7", 10 * HOUR).with_label(KEEP_LABEL, "true");
        assert_eq!(evaluate(&instance, 2 * HOUR, now()), Decision::Kept);

        let ancient = created_ago("tf-pr-8", 1000 * HOUR).with_label(KEEP_LABEL, "yes");
        assert_eq!(evaluate(&ancient, Duration::ZERO, now()), Decision::Kept);
    }

    #[test]
    fn test_empty_keep_label_is_ignored() {
        let instance = created_ago("tf-pr-5", 3 * HOUR).with_label(KEEP_LABEL, "");
        assert_eq!(evaluate(&instance, 2 * HOUR, now()), Decision::Eligible);
    }

    #[test]
    fn test_young_resource_is_kept() {
        let instance = created_ago("tf-pr-9", HOUR);
        assert_eq!(evaluate(&instance, 2 * HOUR, now()), Decision::TooYoung);
    }

    #[test]
    fn test_exact_cutoff_is_too_young() {
        let instance = created_ago("tf-pr-10", 2 * HOUR);
        assert_eq!(evaluate(&instance, 2 * HOUR, now()), Decision::TooYoung);

        let just_older = created_ago("tf-pr-11", 2 * HOUR + Duration::from_millis(1));
        assert_eq!(evaluate(&just_older, 2 * HOUR, now()), Decision::Eligible);
    }

    #[test]
    fn test_old_resource_is_eligible() {
        let instance = created_ago("tf-pr-42", 3 * HOUR);
        assert_eq!(evaluate(&instance, 2 * HOUR, now()), Decision::Eligible);
    }

    #[test]
    fn test_future_creation_is_too_young() {
        let instance = ResourceInstance::new("tf-skew", now() + chrono::Duration::minutes(5));
        assert_eq!(evaluate(&instance, Duration::ZERO, now()), Decision::TooYoung);
    }

    #[test]
    fn test_huge_max_age_never_collects() {
        let instance = created_ago("tf-pr-1", 100_000 * HOUR);
        assert_eq!(evaluate(&instance, Duration::MAX, now()), Decision::TooYoung);
    }

    #[test]
    fn test_policy_cutoff() {
        let policy = RetentionPolicy::new("kind=terraform-test", 2 * HOUR);
        assert_eq!(policy.cutoff(now()), Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
    }
}
