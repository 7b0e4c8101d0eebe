//! # Payment Intents
//!
//! Provider trait for creating payment intents, plus the currency and
//! amount conversions shared by every provider.

use crate::error::{MarketError, MarketResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Currency charged by the marketplace (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Convert a decimal amount to cents, rounding to the nearest cent
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Convert a client-supplied price (number or numeric string) into minor
/// units. Anything below one minor unit is rejected.
pub fn amount_from_price(price: Option<&Value>, currency: Currency) -> MarketResult<i64> {
    let decimal = match price {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| MarketError::invalid_input("price must be a number"))?;

    let amount = currency.to_smallest_unit(decimal);
    if amount < 1 {
        return Err(MarketError::invalid_input("price must be positive"));
    }
    Ok(amount)
}

/// Request to create a payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in smallest currency unit
    pub amount: i64,
    pub currency: Currency,
}

/// A created payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Handed to the client to confirm the payment
    pub client_secret: String,
    pub amount: i64,
    pub currency: Currency,
    pub status: String,
}

/// Payment processor that can create intents.
#[async_trait]
pub trait PaymentIntentProvider: Send + Sync {
    /// Create a payment intent for the given amount.
    async fn create_intent(&self, request: &PaymentIntentRequest) -> MarketResult<PaymentIntent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentIntentProvider = Arc<dyn PaymentIntentProvider>;
