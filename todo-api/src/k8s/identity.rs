use std::env;
use std::path::Path;

use kube::Config;

use crate::k8s::K8sError;

/// Environment variable set by the kubelet when running inside a cluster.
const IN_CLUSTER_HOST_ENV_NAME: &str = "KUBERNETES_SERVICE_HOST";

/// Mounted file containing the namespace of the pod's service account.
const SERVICE_ACCOUNT_NAMESPACE_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Resolved identity used to talk to the Kubernetes API server.
///
/// Bundles the target namespace with the [`kube::Config`] holding the
/// credential chain. Constructed explicitly at startup and handed to the
/// client, so tests can substitute fakes instead of relying on ambient
/// global state.
///
/// In-cluster, the token is re-read from the mounted file by the kube client
/// on a short TTL, so platform-rotated credentials are picked up without a
/// restart.
pub struct ServiceIdentity {
    namespace: String,
    config: Config,
}

impl ServiceIdentity {
    /// Resolves the identity from the process environment.
    ///
    /// Inside a cluster (detected via `KUBERNETES_SERVICE_HOST`) credentials
    /// come from the mounted service account volume and the namespace from
    /// the mounted namespace file. Outside a cluster the local kubeconfig is
    /// used instead, which keeps development workflows working.
    ///
    /// An explicit `namespace_override` takes precedence in both modes.
    pub async fn discover(namespace_override: Option<&str>) -> Result<Self, K8sError> {
        if env::var_os(IN_CLUSTER_HOST_ENV_NAME).is_some() {
            Self::in_cluster(namespace_override)
        } else {
            Self::from_kubeconfig(namespace_override).await
        }
    }

    fn in_cluster(namespace_override: Option<&str>) -> Result<Self, K8sError> {
        let config =
            Config::incluster().map_err(|e| K8sError::Configuration(e.to_string()))?;

        // The namespace must come from the mounted metadata or an explicit
        // override. A guessed default would silently create pods in the
        // wrong namespace and invalidate the RBAC diagnostic.
        let namespace = match namespace_override {
            Some(namespace) => namespace.to_owned(),
            None => read_mounted_namespace(Path::new(SERVICE_ACCOUNT_NAMESPACE_PATH))?,
        };

        Ok(Self { namespace, config })
    }

    async fn from_kubeconfig(namespace_override: Option<&str>) -> Result<Self, K8sError> {
        let config = Config::infer()
            .await
            .map_err(|e| K8sError::Configuration(e.to_string()))?;

        let namespace = namespace_override
            .map(str::to_owned)
            .unwrap_or_else(|| config.default_namespace.clone());

        Ok(Self { namespace, config })
    }

    /// Namespace resolved for this identity.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Splits the identity into its namespace and client configuration.
    pub fn into_parts(self) -> (String, Config) {
        (self.namespace, self.config)
    }
}

/// Reads and validates the namespace from the mounted metadata file.
fn read_mounted_namespace(path: &Path) -> Result<String, K8sError> {
    let namespace = std::fs::read_to_string(path).map_err(|e| {
        K8sError::Configuration(format!(
            "namespace file {} is unreadable: {e}",
            path.display()
        ))
    })?;

    let namespace = namespace.trim().to_owned();
    if namespace.is_empty() {
        return Err(K8sError::Configuration(format!(
            "namespace file {} is empty",
            path.display()
        )));
    }

    Ok(namespace)
}
