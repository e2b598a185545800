use actix_web::{
    HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    web::{Data, Json},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use utoipa::ToSchema;

use crate::routes::ErrorMessage;
use crate::store::ItemStore;

/// Service name fixed at compile time.
const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Build version fixed at compile time; identical for the process lifetime.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bound on the datastore connectivity check performed by the readiness
/// probe. Kept short so a hanging database cannot stall the orchestrator's
/// probing.
const READINESS_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ReadyError {
    #[error("The item datastore is not reachable")]
    DatastoreUnavailable,
}

impl ResponseError for ReadyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReadyError::DatastoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            detail: self.to_string(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    #[schema(example = "ready")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    #[schema(example = "todo-api")]
    pub name: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

#[utoipa::path(
    summary = "Liveness probe",
    description = "Always succeeds while the process can answer requests. \
        Deliberately independent of the datastore: a database outage should \
        remove the instance from traffic routing, not restart it.",
    responses(
        (status = 200, description = "Process is alive.", body = HealthResponse),
    ),
    tag = "Health",
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[utoipa::path(
    summary = "Readiness probe",
    description = "Succeeds only when the item datastore answers a lightweight \
        connectivity check within a bounded timeout.",
    responses(
        (status = 200, description = "Ready to receive traffic.", body = ReadyResponse),
        (status = 503, description = "Datastore unavailable.", body = ErrorMessage),
    ),
    tag = "Health",
)]
#[get("/ready")]
pub async fn ready(store: Data<dyn ItemStore>) -> Result<impl Responder, ReadyError> {
    let reachable = timeout(READINESS_CHECK_TIMEOUT, store.is_reachable())
        .await
        .unwrap_or(false);

    if !reachable {
        return Err(ReadyError::DatastoreUnavailable);
    }

    Ok(Json(ReadyResponse {
        status: "ready".to_string(),
    }))
}

#[utoipa::path(
    summary = "Build identity",
    description = "Returns the service name and version set at process start.",
    responses(
        (status = 200, description = "Version returned successfully.", body = VersionResponse),
    ),
    tag = "Health",
)]
#[get("/version")]
pub async fn version() -> impl Responder {
    Json(VersionResponse {
        name: APP_NAME.to_string(),
        version: APP_VERSION.to_string(),
    })
}
