use actix_web::{
    HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    post,
};
use thiserror::Error;

use crate::routes::ErrorMessage;

/// Error returned on purpose by the monitoring test endpoints.
#[derive(Debug, Error)]
#[error("Intentional 500 error for testing monitoring")]
pub struct IntentionalError;

impl ResponseError for IntentionalError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
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

#[utoipa::path(
    summary = "Trigger a 500 error",
    description = "Always fails with a 500. Used to exercise error-rate \
        alerting and dashboards against a live deployment.",
    responses(
        (status = 500, description = "The intentional error.", body = ErrorMessage),
    ),
    tag = "Monitoring",
)]
#[get("/api/error")]
pub async fn trigger_error() -> Result<impl Responder, IntentionalError> {
    Err::<HttpResponse, _>(IntentionalError)
}

#[utoipa::path(
    summary = "Trigger a 500 error via POST",
    description = "POST variant of the intentional failure endpoint.",
    responses(
        (status = 500, description = "The intentional error.", body = ErrorMessage),
    ),
    tag = "Monitoring",
)]
#[post("/api/error")]
pub async fn trigger_error_post() -> Result<impl Responder, IntentionalError> {
    Err::<HttpResponse, _>(IntentionalError)
}
