use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, PostParams};
use std::time::Duration;

use crate::k8s::{K8sClient, K8sError, ServiceIdentity, map_kube_error};

/// Kubernetes client backed by the [`kube`] crate.
///
/// Holds a namespaced pods handle built from an explicitly resolved
/// [`ServiceIdentity`]. All transport-level timeouts are bounded by the
/// configured request timeout so a slow API server cannot pin request
/// handlers indefinitely.
pub struct HttpK8sClient {
    namespace: String,
    pods: Api<Pod>,
}

impl HttpK8sClient {
    /// Builds a client from a resolved identity.
    pub fn new(identity: ServiceIdentity, request_timeout: Duration) -> Result<Self, K8sError> {
        let (namespace, mut config) = identity.into_parts();

        config.connect_timeout = Some(request_timeout);
        config.read_timeout = Some(request_timeout);

        let client = kube::Client::try_from(config).map_err(map_kube_error)?;
        let pods = Api::namespaced(client, &namespace);

        Ok(Self { namespace, pods })
    }
}

#[async_trait]
impl K8sClient for HttpK8sClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn create_pod(&self, pod: Pod) -> Result<Pod, K8sError> {
        self.pods
            .create(&PostParams::default(), &pod)
            .await
            .map_err(map_kube_error)
    }
}
