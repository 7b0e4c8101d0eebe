//! User accounts.

use super::list;
use crate::error::ApiResult;
use crate::extract::{non_empty, JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{
    fields, Collection, Document, DocumentId, Filter, InsertOneResult, MarketError, UpdateResult,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Response of `POST /user`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Inserted(InsertOneResult),
    Exists {
        message: &'static str,
        #[serde(rename = "insertedId")]
        inserted_id: Option<DocumentId>,
    },
}

impl CreateUserResponse {
    fn exists() -> Self {
        CreateUserResponse::Exists {
            message: "user already exists",
            inserted_id: None,
        }
    }
}

/// `POST /user`: insert unless a user with this email already exists
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(user): JsonBody<Document>,
) -> ApiResult<Json<CreateUserResponse>> {
    let email = user
        .get(fields::EMAIL)
        .and_then(|v| v.as_str())
        .ok_or_else(|| MarketError::invalid_input("email is required"))?
        .to_string();

    let filter = Filter::all().eq(fields::EMAIL, email.as_str());
    if state.store.find_one(Collection::Users, &filter).await?.is_some() {
        return Ok(Json(CreateUserResponse::exists()));
    }

    let result = state.store.insert_one(Collection::Users, user).await?;
    info!(%email, id = %result.inserted_id, "registered user");
    Ok(Json(CreateUserResponse::Inserted(result)))
}

/// `GET /user/{email}`
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Option<Document>>> {
    let filter = Filter::all().eq(fields::EMAIL, email);
    Ok(Json(state.store.find_one(Collection::Users, &filter).await?))
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    list(&state, Collection::Users, Filter::all()).await
}

/// `PATCH /user/{email}`: role changes and profile edits
#[instrument(skip(state, update))]
pub async fn update_user(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
    JsonBody(update): JsonBody<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let filter = Filter::all().eq(fields::EMAIL, email.as_str());
    let result = state
        .store
        .update_one(Collection::Users, &filter, non_empty(update)?)
        .await?;

    info!(matched = result.matched_count, "updated user");
    Ok(Json(result))
}
