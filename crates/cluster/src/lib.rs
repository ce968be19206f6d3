//! Cluster access for Reaper.
//!
//! This crate provides a trait-based interface to the control plane with a
//! `kube` reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod kube_cluster;

pub use trait_::{Cluster, ClusterError, Result};
pub use kube_cluster::{KubeCluster, is_job_active};
