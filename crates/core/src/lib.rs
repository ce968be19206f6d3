//! Reaper core data models.
//!
//! This crate defines the resource and retention types shared by the
//! cluster adapters and the garbage collection engine.

#![warn(missing_docs)]

// Cluster resources
mod resource;

// Retention decisions
mod policy;

// Re-exports
pub use resource::{ResourceInstance, ResourceKind, Labels, KEEP_LABEL, JOB_OWNER_LABEL};
pub use policy::{RetentionPolicy, Decision, Outcome, evaluate, DEFAULT_SELECTOR, DEFAULT_MAX_AGE};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
