//! Token issuance.

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::guard::stored_role;
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::Document;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /jwt`: sign the caller's payload with their stored role
#[instrument(skip_all)]
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Document>,
) -> ApiResult<Json<TokenResponse>> {
    let role = match payload.get("email").and_then(|v| v.as_str()) {
        Some(email) => stored_role(state.store.as_ref(), email).await?,
        None => None,
    };

    let token = state.tokens.issue(payload, role)?;
    info!(role = ?role, "issued access token");

    Ok(Json(TokenResponse { token }))
}
