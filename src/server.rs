//! HTTP surface: routes, shared state and handlers.
//!
//! - `GET /`                      - identification string
//! - `GET /domaininfo/{domain}`   - WHOIS lookup as JSON
//! - `GET /metrics`               - Prometheus exposition

use crate::{
    errors::DomainError,
    metrics,
    resolver::{DomainInfo, DomainInfoResolver},
    response::{DomainInfoResponse, JsonSerializer, ResponseSerializer},
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{sync::Arc, time::Instant};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

pub const ROOT_MESSAGE: &str = "DomainInfo API application";
pub const FALLBACK_BODY: &str = "500 - Internal Server Error";

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<DomainInfoResolver>,
    serializer: Arc<dyn ResponseSerializer>,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(resolver: Arc<DomainInfoResolver>) -> Self {
        Self {
            resolver,
            serializer: Arc::new(JsonSerializer),
            metrics: None,
        }
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn ResponseSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/domaininfo/", get(empty_domain_handler))
        .route("/domaininfo/:domain", get(domain_info_handler))
        .route("/metrics", get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).into_inner())
        .with_state(state)
}

pub async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

pub async fn domain_info_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Response {
    lookup(&state, &domain).await
}

// The router never matches an empty `{domain}` segment, so a bare trailing
// slash is routed here and reported the same way as a blank domain.
async fn empty_domain_handler(State(state): State<AppState>) -> Response {
    lookup(&state, "").await
}

async fn lookup(state: &AppState, domain: &str) -> Response {
    let start_time = Instant::now();
    let result = state.resolver.resolve(domain).await;
    metrics::record_lookup_time(start_time.elapsed());

    match result {
        Ok(info) => domain_info_response(state, domain, info),
        Err(err) => domain_error_response(state, err),
    }
}

fn domain_info_response(state: &AppState, domain: &str, info: DomainInfo) -> Response {
    match state.serializer.domain_info(&DomainInfoResponse::from(info)) {
        Ok(body) => {
            debug!("Resolved WHOIS data for {}", domain);
            metrics::increment_requests("success");
            json_response(StatusCode::OK, body)
        }
        Err(e) => serialization_failure(&e),
    }
}

fn domain_error_response(state: &AppState, err: DomainError) -> Response {
    warn!("{}", err.message);

    match state.serializer.domain_error(&err) {
        Ok(body) => {
            metrics::increment_requests(err.kind.as_str());
            let status =
                StatusCode::from_u16(err.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            json_response(status, body)
        }
        Err(e) => serialization_failure(&e),
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn serialization_failure(err: &serde_json::Error) -> Response {
    error!("Failed to format WHOIS response object as JSON: {}", err);
    metrics::increment_serialization_failures();
    metrics::increment_requests("internal_server_error");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        FALLBACK_BODY,
    )
        .into_response()
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics not initialized".to_string()),
    }
}
