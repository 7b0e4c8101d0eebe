//! Shopping cart items.

use super::{delete_by_id, insert, list, set_by_id};
use crate::error::ApiResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{
    fields, Collection, DeleteResult, Document, Filter, InsertOneResult, UpdateResult,
};
use tracing::instrument;

/// `POST /selectedCart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<Document>,
) -> ApiResult<Json<InsertOneResult>> {
    insert(&state, Collection::Carts, item).await
}

/// `GET /selectedCarts/{email}`
pub async fn user_cart(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::SELECTER_EMAIL, email);
    list(&state, Collection::Carts, filter).await
}

/// `PATCH /massUnit/{id}`: quantity / mass unit change
pub async fn update_mass_unit(
    State(state): State<AppState>,
    id: PathParam<String>,
    JsonBody(update): JsonBody<Document>,
) -> ApiResult<Json<UpdateResult>> {
    set_by_id(&state, Collection::Carts, &id, update).await
}

/// `DELETE /cart/{id}`
#[instrument(skip_all, fields(id = %id.0))]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    id: PathParam<String>,
) -> ApiResult<Json<DeleteResult>> {
    delete_by_id(&state, Collection::Carts, &id).await
}
