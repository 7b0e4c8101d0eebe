//! Payment intents, payment records and revenue views.

use super::{insert, list, set_by_id};
use crate::error::ApiResult;
use crate::extract::{JsonBody, PathParam};
use crate::guard::Caller;
use crate::state::AppState;
use axum::{extract::State, Json};
use medi_core::{
    amount_from_price, fields, status, Collection, Currency, Document, Filter, InsertOneResult,
    MarketError, PaymentIntentRequest, UpdateResult,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Decimal price, as a number or numeric string
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

/// Create payment intent response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /create-payment-intent`
#[instrument(skip_all, fields(email = caller.email().unwrap_or("-")))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(request): JsonBody<CreatePaymentIntentRequest>,
) -> ApiResult<Json<CreatePaymentIntentResponse>> {
    let currency = Currency::USD;
    let amount = amount_from_price(request.price.as_ref(), currency)?;

    let intent = state
        .payments
        .create_intent(&PaymentIntentRequest { amount, currency })
        .await
        .map_err(|e| {
            error!("Failed to create payment intent: {}", e);
            e
        })?;

    info!(
        "Created payment intent {} via {} for {}",
        intent.id,
        state.payments.provider_name(),
        amount
    );

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// `POST /payment`: record a confirmed payment
pub async fn save_payment(
    State(state): State<AppState>,
    JsonBody(payment): JsonBody<Document>,
) -> ApiResult<Json<InsertOneResult>> {
    insert(&state, Collection::Payments, payment).await
}

/// `GET /seles`, `GET /sales`, `GET /adminPaidRevenue`
pub async fn paid_payments(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::STATUS, status::PAID);
    list(&state, Collection::Payments, filter).await
}

/// `GET /adminPendingRevenue`
pub async fn pending_payments(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::STATUS, status::PENDING);
    list(&state, Collection::Payments, filter).await
}

/// `GET /adminPaymentHistory`
pub async fn admin_payment_history(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, Collection::Payments, Filter::all()).await
}

/// `GET /sellerPaidRevenue/{email}`
pub async fn seller_paid_revenue(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all()
        .eq(fields::SELLER_EMAIL, email)
        .eq(fields::STATUS, status::PAID);
    list(&state, Collection::Payments, filter).await
}

/// `GET /sellerPendingRevenue/{email}`
pub async fn seller_pending_revenue(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all()
        .eq(fields::SELLER_EMAIL, email)
        .eq(fields::STATUS, status::PENDING);
    list(&state, Collection::Payments, filter).await
}

/// `GET /sellerPaymentHistory`: payments for the calling seller
pub async fn seller_payment_history(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<Document>>> {
    let email = caller.email().ok_or_else(MarketError::forbidden)?;
    let filter = Filter::all().eq(fields::SELLER_EMAIL, email);
    list(&state, Collection::Payments, filter).await
}

/// `GET /userPaymentHistory/{email}`
pub async fn user_payment_history(
    State(state): State<AppState>,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = Filter::all().eq(fields::EMAIL, email);
    list(&state, Collection::Payments, filter).await
}

/// `PATCH /paymentStatus/{id}`: usually `{ "status": "paid" }`
pub async fn update_payment_status(
    State(state): State<AppState>,
    id: PathParam<String>,
    JsonBody(update): JsonBody<Document>,
) -> ApiResult<Json<UpdateResult>> {
    set_by_id(&state, Collection::Payments, &id, update).await
}
