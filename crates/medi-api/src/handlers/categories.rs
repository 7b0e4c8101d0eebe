//! Medicine categories. Full CRUD for admins.

use super::{delete_by_id, find_by_id, insert, list};
use crate::error::ApiResult;
use crate::extract::{non_empty, JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{
    fields, Collection, DeleteResult, Document, Filter, InsertOneResult, UpdateResult,
};
use tracing::{info, instrument};

/// `POST /category`
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(category): JsonBody<Document>,
) -> ApiResult<Json<InsertOneResult>> {
    insert(&state, Collection::Categories, category).await
}

/// `GET /categories`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    list(&state, Collection::Categories, Filter::all()).await
}

/// `GET /ctgDetails/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    id: PathParam<String>,
) -> ApiResult<Json<Option<Document>>> {
    find_by_id(&state, Collection::Categories, &id).await
}

/// `GET /categoryDetails/{categoryName}` and `GET /specificCategories/{categoryName}`
pub async fn categories_by_name(
    State(state): State<AppState>,
    PathParam(category_name): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::CATEGORY_NAME, category_name);
    list(&state, Collection::Categories, filter).await
}

/// `GET /categories/{email}`: categories owned by an admin
pub async fn admin_categories(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::ADMIN_EMAIL, email);
    list(&state, Collection::Categories, filter).await
}

/// `PUT /category/{id}`: full replacement; fields absent from the body are dropped
#[instrument(skip_all, fields(id = %id.0))]
pub async fn replace_category(
    State(state): State<AppState>,
    id: PathParam<String>,
    JsonBody(category): JsonBody<Document>,
) -> ApiResult<Json<UpdateResult>> {
    let filter = Filter::by_id(&id.document_id()?);
    let result = state
        .store
        .replace_one(Collection::Categories, &filter, non_empty(category)?)
        .await?;

    info!(matched = result.matched_count, "replaced category");
    Ok(Json(result))
}

/// `DELETE /category/{id}`
#[instrument(skip_all, fields(id = %id.0))]
pub async fn delete_category(
    State(state): State<AppState>,
    id: PathParam<String>,
) -> ApiResult<Json<DeleteResult>> {
    delete_by_id(&state, Collection::Categories, &id).await
}
