use todo_api::routes::ErrorMessage;
use todo_api::routes::health::{HealthResponse, ReadyResponse, VersionResponse};
use todo_telemetry::tracing::init_test_tracing;

use crate::support::test_app::spawn_test_app;

mod support;

#[tokio::test(flavor = "multi_thread")]
async fn liveness_probe_returns_200() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let response = app.health().await;

    assert!(response.status().is_success());
    let response: HealthResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(response.status, "healthy");
}

#[tokio::test(flavor = "multi_thread")]
async fn readiness_probe_returns_200_when_datastore_answers() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let response = app.ready().await;

    assert!(response.status().is_success());
    let response: ReadyResponse = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(response.status, "ready");
}

#[tokio::test(flavor = "multi_thread")]
async fn readiness_fails_while_liveness_succeeds_during_datastore_outage() {
    init_test_tracing();
    let app = spawn_test_app().await;

    app.store.set_reachable(false);

    let ready = app.ready().await;
    assert_eq!(ready.status(), 503);
    let error: ErrorMessage = ready.json().await.expect("failed to deserialize response");
    assert!(!error.detail.is_empty());

    // The process is still alive, only traffic routing should change.
    let health = app.health().await;
    assert!(health.status().is_success());

    // Readiness recovers without a restart once the datastore is back.
    app.store.set_reachable(true);
    let ready = app.ready().await;
    assert!(ready.status().is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn version_is_stable_across_requests() {
    init_test_tracing();
    let app = spawn_test_app().await;

    let first: VersionResponse = app
        .version()
        .await
        .json()
        .await
        .expect("failed to deserialize response");
    let second: VersionResponse = app
        .version()
        .await
        .json()
        .await
        .expect("failed to deserialize response");

    assert_eq!(first.name, "todo-api");
    assert!(!first.version.is_empty());
    assert_eq!(first.name, second.name);
    assert_eq!(first.version, second.version);
}
