//! # Request Handlers
//!
//! One handler per route. Each binds path and body, builds an equality
//! filter, performs exactly one storage operation and returns the raw result.

pub mod advertisements;
pub mod auth;
pub mod carts;
pub mod categories;
pub mod medicines;
pub mod payments;
pub mod users;

use crate::error::ApiResult;
use crate::extract::{non_empty, PathParam};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
    Json,
};
use medi_core::{
    Collection, DeleteResult, Document, Filter, InsertOneResult, MarketError, UpdateResult,
};
use tracing::warn;

// =============================================================================
// Shared operations
// =============================================================================

pub(crate) async fn insert(
    state: &AppState,
    collection: Collection,
    doc: Document,
) -> ApiResult<Json<InsertOneResult>> {
    Ok(Json(state.store.insert_one(collection, doc).await?))
}

pub(crate) async fn list(
    state: &AppState,
    collection: Collection,
    filter: Filter,
) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.store.find(collection, &filter).await?))
}

pub(crate) async fn find_by_id(
    state: &AppState,
    collection: Collection,
    id: &PathParam<String>,
) -> ApiResult<Json<Option<Document>>> {
    let filter = Filter::by_id(&id.document_id()?);
    Ok(Json(state.store.find_one(collection, &filter).await?))
}

pub(crate) async fn set_by_id(
    state: &AppState,
    collection: Collection,
    id: &PathParam<String>,
    body: Document,
) -> ApiResult<Json<UpdateResult>> {
    let filter = Filter::by_id(&id.document_id()?);
    let set = non_empty(body)?;
    Ok(Json(state.store.update_one(collection, &filter, set).await?))
}

pub(crate) async fn delete_by_id(
    state: &AppState,
    collection: Collection,
    id: &PathParam<String>,
) -> ApiResult<Json<DeleteResult>> {
    let filter = Filter::by_id(&id.document_id()?);
    Ok(Json(state.store.delete_one(collection, &filter).await?))
}

// =============================================================================
// Service endpoints
// =============================================================================

/// Root greeting
pub async fn root() -> &'static str {
    "Hello from MediSnap Server.."
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let storage = match state.store.ping().await {
        Ok(()) => "up",
        Err(e) => {
            warn!("storage ping failed: {}", e);
            "down"
        }
    };

    Json(serde_json::json!({
        "status": if storage == "up" { "healthy" } else { "degraded" },
        "service": "medisnap",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "backend": state.store.backend_name(),
            "status": storage
        },
        "payments": state.payments.provider_name()
    }))
}

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> ApiResult<()> {
    Err(MarketError::NotFound(uri.path().to_string()).into())
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiResult<()> {
    Err(MarketError::MethodNotAllowed(format!("{} {}", method, uri.path())).into())
}
