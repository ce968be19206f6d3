//! Kubernetes cluster implementation.
//!
//! Terraform resources are read through the dynamic API so no generated
//! CRD types are needed. Jobs use the typed `batch/v1` API.

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use kube::api::{Api, DeleteParams, DynamicObject, ListParams};
use kube::core::{ApiResource, GroupVersionKind};
use kube::{Client, ResourceExt};
use reaper_core::{Labels, ResourceInstance, ResourceKind, JOB_OWNER_LABEL};
use tracing::{debug, info};
use super::{Cluster, ClusterError, Result};

/// Cluster access backed by a `kube` client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl KubeCluster {
    /// Connect using the ambient kubeconfig or in-cluster config.
    ///
    /// An empty or missing namespace falls back to the client's default.
    pub async fn connect(namespace: Option<String>) -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client, namespace))
    }

    /// Wrap an existing client.
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| client.default_namespace().to_string());
        Self { client, namespace }
    }

    fn jobs(&self) -> Api<Job> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

fn api_resource(kind: &ResourceKind) -> ApiResource {
    let gvk = GroupVersionKind::gvk(kind.group, kind.version, kind.kind);
    ApiResource::from_gvk_with_plural(&gvk, kind.plural)
}

fn decode_instance(kind: &ResourceKind, obj: DynamicObject) -> Result<ResourceInstance> {
    let meta = obj.metadata;
    let name = meta.name.ok_or_else(|| ClusterError::Decode {
        kind: kind.kind.to_string(),
        reason: "missing metadata.name".to_string(),
    })?;
    let created_at = meta
        .creation_timestamp
        .map(|t| t.0)
        .ok_or_else(|| ClusterError::Decode {
            kind: kind.kind.to_string(),
            reason: format!("{} has no creationTimestamp", name),
        })?;

    Ok(ResourceInstance {
        name,
        created_at,
        labels: meta.labels.unwrap_or_default().into_iter().collect::<Labels>(),
    })
}

/// Whether a job is still in flight.
///
/// Jobs with a `Complete` or `Failed` condition set to `True` are finished.
pub fn is_job_active(job: &Job) -> bool {
    let finished = job
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| (c.type_ == "Complete" || c.type_ == "Failed") && c.status == "True")
        });
    !finished
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

/// Treat a 404 from the API server as an absent value.
fn found<T>(result: kube::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl Cluster for KubeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list_resources(
        &self,
        kind: &ResourceKind,
        selector: &str,
    ) -> Result<Vec<ResourceInstance>> {
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &self.namespace, &api_resource(kind));

        let Some(list) = found(api.list(&ListParams::default().labels(selector)).await)? else {
            debug!(
                namespace = %self.namespace,
                api_version = %kind.api_version(),
                "No {} resources found", kind.plural
            );
            return Ok(Vec::new());
        };

        list.items
            .into_iter()
            .map(|obj| decode_instance(kind, obj))
            .collect()
    }

    async fn delete_active_jobs(&self, owner: &str) -> Result<Vec<String>> {
        let jobs = self.jobs();
        let selector = format!("{}={}", JOB_OWNER_LABEL, owner);
        let list = jobs.list(&ListParams::default().labels(&selector)).await?;

        let mut deleted = Vec::new();
        for job in list.items.iter().filter(|job| is_job_active(job)) {
            let name = job.name_any();
            match found(jobs.delete(&name, &DeleteParams::background()).await)? {
                Some(_) => {
                    info!(
                        namespace = %self.namespace,
                        job = %name,
                        "Deleted active Job for {}", owner
                    );
                    deleted.push(name);
                }
                None => debug!(namespace = %self.namespace, job = %name, "Job already gone"),
            }
        }

        Ok(deleted)
    }
}
