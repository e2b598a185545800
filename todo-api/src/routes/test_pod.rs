use actix_web::{
    HttpResponse, Responder, ResponseError,
    http::{StatusCode, header::ContentType},
    post,
    web::Data,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

use crate::config::ApiConfig;
use crate::k8s::{K8sClient, K8sError, run_diagnostic};
use crate::routes::ErrorMessage;

#[derive(Debug, Error)]
pub enum TestPodError {
    #[error(
        "Kubernetes support is not available; the in-cluster client could not be initialized"
    )]
    K8sClientUnavailable,

    #[error(transparent)]
    K8s(#[from] K8sError),
}

impl TestPodError {
    fn to_message(&self) -> String {
        match self {
            // Transport internals stay out of responses; every taxonomy
            // variant, denials included, is surfaced verbatim.
            TestPodError::K8s(K8sError::Kube(_)) => "internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl ResponseError for TestPodError {
    fn status_code(&self) -> StatusCode {
        match self {
            TestPodError::K8sClientUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            TestPodError::K8s(K8sError::Auth(_) | K8sError::PermissionDenied(_)) => {
                StatusCode::FORBIDDEN
            }
            TestPodError::K8s(K8sError::Conflict(_)) => StatusCode::CONFLICT,
            TestPodError::K8s(K8sError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            TestPodError::K8s(K8sError::Connectivity(_)) => StatusCode::BAD_GATEWAY,
            TestPodError::K8s(K8sError::Configuration(_) | K8sError::Kube(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            detail: self.to_message(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTestPodResponse {
    #[schema(example = "test-pod-3c9f2a51-92cf-4b6e-a1de-0f2a7a6c2f4b")]
    pub pod_name: String,
    #[schema(example = "todolist")]
    pub namespace: String,
}

#[utoipa::path(
    summary = "Self-test pod-create permission",
    description = "Creates a throwaway diagnostic pod with the service's own \
        service account to verify its RBAC permissions. A 403 is the expected \
        outcome when RBAC is intentionally restrictive and carries the API \
        server's denial message verbatim. The created pod is never deleted by \
        this service; cleanup is the cluster operator's concern.",
    responses(
        (status = 201, description = "Pod creation accepted by the API server.",
            body = CreateTestPodResponse),
        (status = 403, description = "The service account lacks pod-create permission.",
            body = ErrorMessage),
        (status = 409, description = "A pod with the generated name already exists; retry.",
            body = ErrorMessage),
        (status = 502, description = "The API server is unreachable.", body = ErrorMessage),
        (status = 503, description = "No Kubernetes client is available.", body = ErrorMessage),
        (status = 504, description = "The API server did not answer in time.", body = ErrorMessage),
    ),
    tag = "Diagnostics",
)]
#[post("/api/test-pod")]
pub async fn create_test_pod(
    config: Data<ApiConfig>,
    k8s_client: Option<Data<dyn K8sClient>>,
) -> Result<impl Responder, TestPodError> {
    let k8s_client = k8s_client.ok_or(TestPodError::K8sClientUnavailable)?;

    let created = match run_diagnostic(k8s_client.get_ref(), &config.kubernetes).await {
        Ok(created) => created,
        Err(e) => {
            counter!("diagnostic_pod_failures_total").increment(1);
            warn!(error = %e, "diagnostic pod creation failed");
            return Err(e.into());
        }
    };

    counter!("diagnostic_pods_created_total").increment(1);

    Ok(HttpResponse::Created().json(CreateTestPodResponse {
        pod_name: created.pod_name,
        namespace: created.namespace,
    }))
}
