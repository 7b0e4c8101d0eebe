//! # Stripe Payment Intents
//!
//! Implementation of the Stripe PaymentIntents API. The client confirms the
//! intent with the returned client secret; this server never sees card data.

use crate::config::StripeConfig;
use async_trait::async_trait;
use medi_core::{
    MarketError, MarketResult, PaymentIntent, PaymentIntentProvider, PaymentIntentRequest,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe PaymentIntent strategy
pub struct StripePaymentIntentStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentIntentStrategy {
    /// Create a new Stripe payment-intent strategy
    pub fn new(config: StripeConfig) -> MarketResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MarketError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> MarketResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn form_params(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.as_str().to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ]
    }
}

#[async_trait]
impl PaymentIntentProvider for StripePaymentIntentStrategy {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_intent(&self, request: &PaymentIntentRequest) -> MarketResult<PaymentIntent> {
        if request.amount < 1 {
            return Err(MarketError::invalid_input("amount must be positive"));
        }

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        debug!("Creating Stripe payment intent: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&Self::form_params(request))
            .send()
            .await
            .map_err(|e| MarketError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::upstream(PROVIDER, e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(MarketError::upstream(PROVIDER, error_response.error.message));
            }

            return Err(MarketError::upstream(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            MarketError::upstream(PROVIDER, format!("Failed to parse Stripe response: {}", e))
        })?;

        info!("Created Stripe payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: request.currency,
            status: intent.status,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    client_secret: String,
    amount: i64,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
