use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use weatherx_core::{CacheError, Config, FullWeatherReport, WeatherService};

pub const ONLINE_STATUS: &str = "WeatherXAI backend online";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

/// Error type for HTTP handlers; rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Cache(CacheError),
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Cache(err) => {
                error!(error = %err, "cache unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct FullDataQuery {
    #[serde(rename = "locationName")]
    location_name: Option<String>,
}

/// Build the router with CORS and request tracing applied.
pub fn app(state: AppState, frontend_url: &str) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/", get(root))
        .route("/weather/full_data", get(full_data))
        .with_state(state)
        .layer(cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http()))
}

/// `*` allows any origin without credentials; an explicit origin allows
/// credentials and mirrors the requested methods and headers.
pub fn cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin = frontend_url.trim().trim_end_matches('/');

    if origin.is_empty() || origin == "*" {
        return Ok(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }

    let origin: HeaderValue =
        origin.parse().with_context(|| format!("Invalid CORS origin: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub async fn serve(config: &Config, bind: &str) -> anyhow::Result<()> {
    let service = weatherx_core::service_from_config(config)?;
    let state = AppState {
        service: Arc::new(service),
    };
    let app = app(state, &config.server.frontend_url)?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind HTTP server on {bind}"))?;
    info!("Starting weatherx v{} on {}", env!("CARGO_PKG_VERSION"), listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "status": ONLINE_STATUS }))
}

async fn full_data(
    State(state): State<AppState>,
    Query(query): Query<FullDataQuery>,
) -> Result<Json<FullWeatherReport>, ApiError> {
    let location = query
        .location_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("locationName is required".into()))?;

    let report = state.service.full_data(&location).await?;
    Ok(Json(report))
}
