use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use std::time::Duration;
use thiserror::Error;

/// Errors emitted by the Kubernetes integration.
///
/// The variants mirror the outcomes an operator cares about when probing
/// RBAC: a denial is an informative result, not a service fault, and is kept
/// distinct from transport problems.
#[derive(Debug, Error)]
pub enum K8sError {
    /// The in-cluster credential or namespace sources are missing or
    /// unreadable. Fatal to the request, never silently defaulted.
    #[error("Kubernetes runtime configuration is missing or unreadable: {0}")]
    Configuration(String),

    /// The service account token was rejected by the API server.
    #[error("The service account credentials were rejected: {0}")]
    Auth(String),

    /// The API server denied the operation. Expected when RBAC is
    /// intentionally restrictive; surfaced verbatim to the caller.
    #[error("The API server denied the request: {0}")]
    PermissionDenied(String),

    /// A resource with the same name already exists. A retry generates a
    /// fresh name.
    #[error("A resource with the same name already exists: {0}")]
    Conflict(String),

    /// The API server could not be reached.
    #[error("The API server could not be reached: {0}")]
    Connectivity(String),

    /// The API server did not answer within the configured bound.
    #[error("The API server did not answer within {}s", .0.as_secs())]
    Timeout(Duration),

    /// Any other error returned by the [`kube`] client.
    #[error("An error occurred with kube when talking to the API server: {0}")]
    Kube(#[from] kube::Error),
}

/// Maps a [`kube::Error`] into the taxonomy above.
///
/// API-level status codes are inspected first so that RBAC denials and name
/// conflicts keep their meaning instead of collapsing into a generic failure.
pub fn map_kube_error(error: kube::Error) -> K8sError {
    match error {
        kube::Error::Api(response) => match response.code {
            401 => K8sError::Auth(response.message),
            403 => K8sError::PermissionDenied(response.message),
            409 => K8sError::Conflict(response.message),
            _ => K8sError::Kube(kube::Error::Api(response)),
        },
        kube::Error::Auth(e) => K8sError::Auth(e.to_string()),
        kube::Error::HyperError(e) => K8sError::Connectivity(e.to_string()),
        kube::Error::Service(e) => K8sError::Connectivity(e.to_string()),
        e => K8sError::Kube(e),
    }
}

/// Client interface describing the Kubernetes operations used by the API.
///
/// The only operation is pod creation: acceptance of the create request by
/// the API server is the success condition, not the pod reaching Running.
#[async_trait]
pub trait K8sClient: Send + Sync {
    /// Namespace diagnostic pods are created in.
    fn namespace(&self) -> &str;

    /// Submits a pod create request and returns the created object.
    async fn create_pod(&self, pod: Pod) -> Result<Pod, K8sError>;
}
