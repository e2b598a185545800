use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::trace;

/// Latency buckets for [`REQUEST_DURATION_METRIC`], in seconds.
const REQUEST_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const REQUESTS_TOTAL_METRIC: &str = "http_requests_total";
const REQUEST_DURATION_METRIC: &str = "http_request_duration_seconds";
const INFLIGHT_REQUESTS_METRIC: &str = "http_inflight_requests";

// A mutex is used instead of OnceLock because installing the recorder is
// fallible and OnceLock::get_or_try_init is still unstable. Installing the
// global recorder twice fails, and while that cannot happen during normal
// operation, tests spawn the application repeatedly in one process.
static PROMETHEUS_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let mut prometheus_handle = PROMETHEUS_HANDLE.lock().unwrap();

    if let Some(handle) = &*prometheus_handle {
        return Ok(handle.clone());
    }

    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(REQUEST_DURATION_METRIC.to_string()),
        REQUEST_DURATION_BUCKETS,
    )?;

    let handle = builder.install_recorder()?;
    *prometheus_handle = Some(handle.clone());

    let handle_clone = handle.clone();

    // Periodic upkeep avoids unbounded memory growth in the recorder.
    tokio::spawn(async move {
        loop {
            let upkeep_timeout = Duration::from_secs(5);
            tokio::time::sleep(upkeep_timeout).await;
            trace!("running metrics upkeep");
            handle_clone.run_upkeep();
        }
    });

    Ok(handle)
}

/// Middleware recording per-request metrics for every route.
///
/// Emits `http_requests_total{method,route,status}`,
/// `http_request_duration_seconds{method,route}` and
/// `http_inflight_requests{route}`. The route label uses the matched route
/// pattern (`/api/items/{item_id}`, not the concrete path) so path
/// parameters do not explode label cardinality.
pub async fn record_request_metrics(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().to_string();
    let route = req
        .match_pattern()
        .unwrap_or_else(|| req.path().to_owned());

    let inflight = gauge!(INFLIGHT_REQUESTS_METRIC, "route" => route.clone());
    inflight.increment(1.0);
    let started_at = Instant::now();

    let result = next.call(req).await;

    let elapsed = started_at.elapsed();
    inflight.decrement(1.0);

    let status = match &result {
        Ok(response) => response.status(),
        Err(error) => error.as_response_error().status_code(),
    };

    counter!(
        REQUESTS_TOTAL_METRIC,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    histogram!(
        REQUEST_DURATION_METRIC,
        "method" => method,
        "route" => route
    )
    .record(elapsed.as_secs_f64());

    result
}
