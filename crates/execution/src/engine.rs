//! The garbage collection engine - runs one retention pass.

use crate::deleter::CascadingDeleter;
use crate::error::{GcError, Result};
use crate::report::RunReport;
use reaper_cluster::Cluster;
use reaper_core::{Decision, Outcome, ResourceKind, RetentionPolicy, Time};
use reaper_tools::ImperativeDelete;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Kind of resource to collect
    pub kind: ResourceKind,
    /// Selector and maximum age
    pub policy: RetentionPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: ResourceKind::TERRAFORM,
            policy: RetentionPolicy::default(),
        }
    }
}

/// Where a pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started
    Idle,
    /// Checking client and namespace
    Validating,
    /// Listing resources
    Enumerating,
    /// Evaluating and deleting the resource at `index`
    Processing {
        /// Position in enumeration order
        index: usize,
        /// Number of resources listed
        total: usize,
    },
    /// Every resource processed
    Done,
    /// Stopped at the first fatal error
    Failed,
}

/// The garbage collection engine.
///
/// Runs a single sequential pass:
/// ```text
/// Validate → Enumerate → (Evaluate → Delete) per resource → Done
/// ```
pub struct GcEngine {
    cluster: Arc<dyn Cluster>,
    deleter: CascadingDeleter,
    config: EngineConfig,
    state: RunState,
}

impl GcEngine {
    /// Create an engine.
    pub fn new(cluster: Arc<dyn Cluster>, imperative: Arc<dyn ImperativeDelete>) -> Self {
        Self {
            deleter: CascadingDeleter::new(cluster.clone(), imperative),
            cluster,
            config: EngineConfig::default(),
            state: RunState::Idle,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one pass against the current time.
    pub async fn run(&mut self) -> Result<RunReport> {
        self.run_at(chrono::Utc::now()).await
    }

    /// Run one pass, judging ages against `now`.
    ///
    /// Stops at the first error; resources after the failing one are not touched.
    pub async fn run_at(&mut self, now: Time) -> Result<RunReport> {
        let result = self.pass(now).await;
        self.state = if result.is_ok() { RunState::Done } else { RunState::Failed };
        result
    }

    async fn pass(&mut self, now: Time) -> Result<RunReport> {
        self.state = RunState::Validating;
        self.validate()?;

        let kind = self.config.kind;
        let policy = self.config.policy.clone();
        let namespace = self.cluster.namespace().to_string();

        self.state = RunState::Enumerating;
        let instances = self
            .cluster
            .list_resources(&kind, &policy.selector)
            .await
            .map_err(|source| GcError::Query {
                kind: kind.kind.to_string(),
                namespace: namespace.clone(),
                selector: policy.selector.clone(),
                source,
            })?;

        let cutoff = policy.cutoff(now);
        debug!(
            namespace = %namespace,
            selector = %policy.selector,
            count = instances.len(),
            cutoff = %cutoff,
            "Listed {} resources", kind
        );

        let mut report = RunReport::new(namespace, cutoff);
        let total = instances.len();

        for (index, instance) in instances.into_iter().enumerate() {
            self.state = RunState::Processing { index, total };
            let name = &instance.name;

            let outcome = match policy.evaluate(&instance, now) {
                Decision::Kept => {
                    info!("not removing {} {} as it has a keep label", kind, name);
                    Outcome::SkippedKept
                }
                Decision::TooYoung => {
                    let created = instance.created_at;
                    info!("not removing {} {} as it was created at {}", kind, name, created);
                    Outcome::SkippedTooYoung
                }
                Decision::Eligible => {
                    let jobs = self.deleter.delete(&kind, name).await?;
                    let created = instance.created_at;
                    info!("deleted {} {} as it was created at: {}", kind, name, created);
                    Outcome::Deleted { jobs }
                }
            };

            report.record(instance.name, instance.created_at, outcome);
        }

        Ok(report)
    }

    fn validate(&self) -> Result<()> {
        if self.cluster.namespace().is_empty() {
            return Err(GcError::Setup {
                reason: "no namespace could be resolved".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    /// Current state of the pass.
    pub fn state(&self) -> RunState {
        self.state
    }
}
