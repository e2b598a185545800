use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;
use uuid::Uuid;

use crate::config::KubernetesConfig;
use crate::k8s::{K8sClient, K8sError};

/// Name prefix shared by all diagnostic pods.
const POD_NAME_PREFIX: &str = "test-pod";

/// Container name inside the diagnostic pod.
const CONTAINER_NAME: &str = "test-container";

/// Label identifying pods created by this service.
const CREATED_BY_LABEL_VALUE: &str = "todo-api";

/// Outcome of a successful diagnostic run.
#[derive(Debug, Clone)]
pub struct CreatedPod {
    pub pod_name: String,
    pub namespace: String,
}

/// Creates one throwaway pod to prove the service account holds pod-create
/// permission.
///
/// The pod name is generated fresh on every invocation with no prior
/// uniqueness check; a collision surfaces as [`K8sError::Conflict`] and a
/// retry gets a new name. The call is bounded by the configured request
/// timeout. The orchestrator never polls for completion and never deletes
/// the pod; cleanup is left to the cluster operator, who can select on the
/// `created-by` label.
pub async fn run_diagnostic(
    client: &dyn K8sClient,
    config: &KubernetesConfig,
) -> Result<CreatedPod, K8sError> {
    let pod_name = generate_pod_name();
    let namespace = client.namespace().to_owned();
    let pod = build_diagnostic_pod(&pod_name, &namespace, &config.pod_image);

    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let created = timeout(request_timeout, client.create_pod(pod))
        .await
        .map_err(|_| K8sError::Timeout(request_timeout))??;

    // Prefer the name echoed back by the API server, should it differ.
    let pod_name = created.metadata.name.unwrap_or(pod_name);

    info!(%pod_name, %namespace, "diagnostic pod accepted by the api server");

    Ok(CreatedPod {
        pod_name,
        namespace,
    })
}

/// Generates a pod name unique with high probability within the namespace.
fn generate_pod_name() -> String {
    format!("{POD_NAME_PREFIX}-{}", Uuid::new_v4())
}

/// Builds the minimal diagnostic pod specification.
///
/// One unprivileged container with a short-lived command, bounded resource
/// requests and limits, and a restart policy that never reschedules a failed
/// run.
fn build_diagnostic_pod(pod_name: &str, namespace: &str, image: &str) -> Pod {
    let labels = BTreeMap::from([
        ("app".to_string(), POD_NAME_PREFIX.to_string()),
        ("created-by".to_string(), CREATED_BY_LABEL_VALUE.to_string()),
    ]);

    let requests = BTreeMap::from([
        ("cpu".to_string(), Quantity("50m".to_string())),
        ("memory".to_string(), Quantity("64Mi".to_string())),
    ]);
    let limits = BTreeMap::from([
        ("cpu".to_string(), Quantity("100m".to_string())),
        ("memory".to_string(), Quantity("128Mi".to_string())),
    ]);

    Pod {
        metadata: ObjectMeta {
            name: Some(pod_name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..ObjectMeta::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: CONTAINER_NAME.to_string(),
                image: Some(image.to_string()),
                command: Some(vec!["sleep".to_string(), "3600".to_string()]),
                resources: Some(ResourceRequirements {
                    requests: Some(requests),
                    limits: Some(limits),
                    ..ResourceRequirements::default()
                }),
                ..Container::default()
            }],
            restart_policy: Some("Never".to_string()),
            ..PodSpec::default()
        }),
        ..Pod::default()
    }
}
