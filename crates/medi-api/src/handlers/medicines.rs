//! Medicine listings.

use super::{find_by_id, insert, list};
use crate::error::ApiResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{fields, Collection, Document, Filter, InsertOneResult};

/// `POST /medicine`
pub async fn create_medicine(
    State(state): State<AppState>,
    JsonBody(medicine): JsonBody<Document>,
) -> ApiResult<Json<InsertOneResult>> {
    insert(&state, Collection::Medicines, medicine).await
}

/// `GET /medicines`
pub async fn list_medicines(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    list(&state, Collection::Medicines, Filter::all()).await
}

/// `GET /mediDetails/{id}`
pub async fn get_medicine(
    State(state): State<AppState>,
    id: PathParam<String>,
) -> ApiResult<Json<Option<Document>>> {
    find_by_id(&state, Collection::Medicines, &id).await
}

/// `GET /discount`: everything not listed at a "0" discount
pub async fn discounted_medicines(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().ne(fields::DISCOUNT_PERCENTAGE, "0");
    list(&state, Collection::Medicines, filter).await
}

/// `GET /medicines/{email}`
pub async fn seller_medicines(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::ADDER_EMAIL, email);
    list(&state, Collection::Medicines, filter).await
}
