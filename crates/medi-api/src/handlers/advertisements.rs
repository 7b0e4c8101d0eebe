//! Seller advertisements and their moderation.

use super::{insert, list, set_by_id};
use crate::error::ApiResult;
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{fields, Collection, Document, Filter, InsertOneResult, UpdateResult};

/// `POST /advertisement`
pub async fn create_advertisement(
    State(state): State<AppState>,
    JsonBody(advertisement): JsonBody<Document>,
) -> ApiResult<Json<InsertOneResult>> {
    insert(&state, Collection::Advertisements, advertisement).await
}

/// `GET /sliderAdvertisement` (public) and `GET /manageAdvertisements` (admin)
pub async fn list_advertisements(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, Collection::Advertisements, Filter::all()).await
}

/// `GET /advertisements/{email}`
pub async fn seller_advertisements(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::SELLER_EMAIL, email);
    list(&state, Collection::Advertisements, filter).await
}

/// `PATCH /advertisement/{id}`: usually `{ "status": ... }`
pub async fn update_advertisement(
    State(state): State<AppState>,
    id: PathParam<String>,
    JsonBody(update): JsonBody<Document>,
) -> ApiResult<Json<UpdateResult>> {
    set_by_id(&state, Collection::Advertisements, &id, update).await
}
