use serde::Deserialize;
use std::fmt;
use todo_config::shared::{PgConnectionConfig, SentryConfig};

/// Complete configuration for the todo backend service.
///
/// Contains all settings required to run the API including the database
/// connection, server settings, Kubernetes diagnostics, and optional
/// monitoring.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Database connection configuration.
    pub database: PgConnectionConfig,
    /// Application server settings.
    pub application: ApplicationSettings,
    /// Kubernetes diagnostics settings.
    pub kubernetes: KubernetesConfig,
    /// Optional Sentry configuration for error tracking.
    pub sentry: Option<SentryConfig>,
}

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    /// Host address the API listens on.
    pub host: String,
    /// Port number the API listens on.
    pub port: u16,
}

impl fmt::Display for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    host: {}", self.host)?;
        writeln!(f, "    port: {}", self.port)
    }
}

/// Settings for the diagnostic pod created by the RBAC self-test endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct KubernetesConfig {
    /// Container image used for diagnostic pods.
    #[serde(default = "default_pod_image")]
    pub pod_image: String,
    /// Upper bound, in seconds, on a single request to the Kubernetes API
    /// server.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Namespace to create diagnostic pods in.
    ///
    /// When unset, the namespace mounted into the pod's service account
    /// volume is used in-cluster, or the kubeconfig context namespace when
    /// running locally.
    pub namespace: Option<String>,
}

fn default_pod_image() -> String {
    "busybox:latest".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}
