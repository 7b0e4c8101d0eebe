//! # medi-stripe
//!
//! Stripe payment-intent provider for the MediSnap API.
//!
//! The marketplace never handles card data: it creates a PaymentIntent for
//! the cart total and hands the intent's client secret back to the browser,
//! which confirms the payment with Stripe.js.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use medi_stripe::StripePaymentIntentStrategy;
//! use medi_core::{Currency, PaymentIntentProvider, PaymentIntentRequest};
//!
//! let stripe = StripePaymentIntentStrategy::from_env()?;
//! let intent = stripe
//!     .create_intent(&PaymentIntentRequest { amount: 2500, currency: Currency::USD })
//!     .await?;
//!
//! // Send intent.client_secret to the client
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::StripePaymentIntentStrategy;
