//! API Gateway service - main entry point.
//!
//! Serves `POST /rpc`, `GET /health` and `GET /metrics` on one HTTP port.

use crate::domain::config::{GatewayConfig, LimitsConfig};
use crate::domain::error::{ApiError, GatewayError};
use crate::domain::methods::{get_method_info, MethodInfo};
use crate::middleware::{record_rpc_method, GatewayMetrics, MiddlewareStack, RequestTimer};
use crate::rpc::{Params, RpcHandlers};
use crate::VERSION;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use shared_types::{ErrorKind, Session};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tracing::{debug, error, info, warn};

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    rpc_handlers: Arc<RpcHandlers>,
    metrics: Arc<GatewayMetrics>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(config: GatewayConfig, rpc_handlers: RpcHandlers) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        if config.auth.staff_tokens.is_empty() {
            warn!("No staff tokens configured; every staff method will be rejected");
        }

        Ok(Self {
            config,
            rpc_handlers: Arc::new(rpc_handlers),
            metrics: Arc::new(GatewayMetrics::new()),
            shutdown_tx: None,
            server: None,
        })
    }

    /// Bind the HTTP port and serve in a background task.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// the configured port is 0.
    pub async fn start(&mut self) -> Result<SocketAddr, GatewayError> {
        info!("Starting API Gateway...");

        let listener = tokio::net::TcpListener::bind(self.config.http_addr())
            .await
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = self.router();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.server = Some(server);

        info!(addr = %addr, "API Gateway started");
        Ok(addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(&mut self) -> Result<(), GatewayError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(server) = self.server.take() {
            match server.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(error = %e, "HTTP server error");
                    return Err(GatewayError::Serve(e.to_string()));
                }
                Err(e) => return Err(GatewayError::Serve(e.to_string())),
            }
        }

        info!("API Gateway stopped");
        Ok(())
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the HTTP router with the full middleware stack.
    pub fn router(&self) -> Router {
        let stack = MiddlewareStack::from_config(&self.config, Arc::clone(&self.metrics));
        let state = AppState {
            rpc_handlers: Arc::clone(&self.rpc_handlers),
            metrics: stack.metrics(),
            limits: Arc::new(self.config.limits.clone()),
        };

        let middleware = ServiceBuilder::new()
            .layer(stack.cors)
            .layer(stack.body_limit)
            .layer(stack.tracing)
            .layer(stack.timeout)
            .layer(stack.auth);

        Router::new()
            .route("/rpc", post(handle_json_rpc))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_export))
            .layer(middleware)
            .with_state(state)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    rpc_handlers: Arc<RpcHandlers>,
    metrics: Arc<GatewayMetrics>,
    limits: Arc<LimitsConfig>,
}

/// Handle a JSON-RPC request or batch
async fn handle_json_rpc(
    State(state): State<AppState>,
    session: Option<Extension<Session>>,
    body: String,
) -> Response {
    let session = session.map(|Extension(s)| s);

    let request: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => return ApiError::parse_error(e.to_string()).into_response(),
    };

    match request {
        Value::Array(calls) => {
            if calls.is_empty() {
                return ApiError::invalid_request("empty batch").into_response();
            }
            if calls.len() > state.limits.max_batch_size {
                return ApiError::limit_exceeded(format!(
                    "batch of {} exceeds {} calls",
                    calls.len(),
                    state.limits.max_batch_size
                ))
                .into_response();
            }

            let mut responses = Vec::with_capacity(calls.len());
            for call in &calls {
                let (id, result) = process_single_request(&state, session.as_ref(), call).await;
                responses.push(envelope(id, result));
            }
            (StatusCode::OK, Json(Value::Array(responses))).into_response()
        }
        single => {
            let (id, result) = process_single_request(&state, session.as_ref(), &single).await;
            let status = match &result {
                Ok(_) => StatusCode::OK,
                Err(e) => e.http_status(),
            };
            (status, Json(envelope(id, result))).into_response()
        }
    }
}

fn envelope(id: Value, result: Result<Value, ApiError>) -> Value {
    match result {
        Ok(value) => serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": value
        }),
        Err(e) => serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": e
        }),
    }
}

/// Process a single JSON-RPC call. Returns the id to echo and the outcome.
async fn process_single_request(
    state: &AppState,
    session: Option<&Session>,
    request: &Value,
) -> (Value, Result<Value, ApiError>) {
    let id = match validate_id(request, &state.limits) {
        Ok(id) => id,
        Err(e) => return (Value::Null, Err(e)),
    };

    if request.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return (id, Err(ApiError::invalid_request("jsonrpc must be \"2.0\"")));
    }

    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return (id, Err(ApiError::invalid_request("missing method")));
    };

    let Some(info) = get_method_info(method) else {
        RequestTimer::new(Arc::clone(&state.metrics), "unknown", false)
            .finish(Err(ErrorKind::NotFound));
        return (id, Err(ApiError::method_not_found(method)));
    };

    let result = call_method(state, info, session, request.get("params")).await;
    (id, result)
}

async fn call_method(
    state: &AppState,
    info: &'static MethodInfo,
    session: Option<&Session>,
    params: Option<&Value>,
) -> Result<Value, ApiError> {
    record_rpc_method(info.name);
    let timer = RequestTimer::new(Arc::clone(&state.metrics), info.name, info.is_write);

    if info.tier.requires_auth() && session.is_none() {
        warn!(method = info.name, "Staff method called without a valid session");
        state.metrics.record_unauthorized();
        timer.finish(Err(ErrorKind::Unauthorized));
        return Err(ApiError::unauthorized("staff session required"));
    }

    let result = state
        .rpc_handlers
        .dispatch(info, Params::new(params), session)
        .await;

    match &result {
        Ok(_) => debug!(method = info.name, "RPC call completed"),
        Err(e) => debug!(method = info.name, code = e.code, "RPC call failed"),
    }
    timer.finish(result.as_ref().map(|_| ()).map_err(ApiError::kind));
    result
}

/// Check the request id.
///
/// Notifications (no id or a null id) are rejected: every call must be
/// answered so the dashboard can match responses to requests.
fn validate_id(request: &Value, limits: &LimitsConfig) -> Result<Value, ApiError> {
    if !request.is_object() {
        return Err(ApiError::invalid_request("call must be an object"));
    }

    let id = match request.get("id") {
        None | Some(Value::Null) => {
            return Err(ApiError::invalid_request(
                "null id (notifications not supported)",
            ))
        }
        Some(id) => id,
    };

    match id {
        Value::String(s) if s.is_empty() => Err(ApiError::invalid_request("empty string id")),
        Value::String(s) if s.len() > limits.max_id_length => Err(ApiError::invalid_request(
            format!("id string too long (max {} chars)", limits.max_id_length),
        )),
        Value::String(_) | Value::Number(_) => Ok(id.clone()),
        _ => Err(ApiError::invalid_request("id must be string or number")),
    }
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
    }))
}

/// Prometheus text export: shared subsystem series plus gateway counters.
async fn metrics_export(State(state): State<AppState>) -> Response {
    match cms_telemetry::encode_metrics() {
        Ok(mut text) => {
            text.push_str(&state.metrics.to_prometheus());
            (
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                text,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}
