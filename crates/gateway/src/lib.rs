//! Name Registry Gateway
//!
//! Read-only HTTP API over a [`NameResolver`]:
//! - `GET /reverse/:name` → `{"Address": ...}` (suffixed name → owner)
//! - `GET /resolve/:address` → `{"Name": ...}` (owner → suffixed name)

pub mod config;
pub mod seed;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use namereg_registry::{Address, NameDetails, NameResolver, RegistryError};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    resolver: NameResolver,
}

impl AppState {
    pub fn new(resolver: NameResolver) -> Self {
        Self { resolver }
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

#[derive(Debug, Serialize)]
struct AddressResponse {
    #[serde(rename = "Address")]
    address: Address,
}

#[derive(Debug, Serialize)]
struct NameResponse {
    #[serde(rename = "Name")]
    name: String,
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reverse/:name", get(resolve_forward))
        .route("/resolve/:address", get(resolve_reverse))
        .route("/api/health", get(health))
        .route("/api/names/:name", get(get_details))
        .route("/api/owners", get(list_owners))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "namereg-gateway"
    }))
}

async fn resolve_forward(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    match state.resolver.resolve_forward(&name) {
        Ok(Some(address)) => Ok(Json(AddressResponse { address })),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("{name} is not registered"),
        )),
        Err(err) => Err(registry_error(err)),
    }
}

async fn resolve_reverse(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<NameResponse>, ApiError> {
    let owner: Address = address
        .parse()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Invalid address: {e}")))?;
    state
        .resolver
        .resolve_reverse(&owner)
        .map(|name| Json(NameResponse { name }))
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                format!("{owner} does not hold a name"),
            )
        })
}

async fn get_details(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<NameDetails>, ApiError> {
    state
        .resolver
        .details(&name)
        .map(Json)
        .map_err(registry_error)
}

async fn list_owners(State(state): State<Arc<AppState>>) -> Json<Vec<Address>> {
    Json(state.resolver.list_all_owners())
}

fn error_response(status: StatusCode, message: String) -> ApiError {
    (status, Json(serde_json::json!({ "error": message })))
}

fn registry_error(err: RegistryError) -> ApiError {
    let status = match &err {
        RegistryError::Validation { .. } => StatusCode::BAD_REQUEST,
        RegistryError::NotRegistered { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}
