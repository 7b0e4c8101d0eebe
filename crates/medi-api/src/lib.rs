//! # medi-api
//!
//! HTTP API layer for the MediSnap marketplace.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Bearer-token and role guards
//! - REST endpoints over users, medicines, categories, advertisements,
//!   carts and payments
//!
//! ## Endpoints (selection)
//!
//! | Method | Path | Guard | Description |
//! |--------|------|-------|-------------|
//! | GET | `/health` | - | Health check |
//! | POST | `/jwt` | - | Issue access token |
//! | POST | `/user` | - | Register user |
//! | GET | `/users` | admin | List users |
//! | POST | `/medicine` | seller/admin | Add medicine |
//! | PUT | `/category/{id}` | admin | Replace category |
//! | POST | `/selectedCart` | user | Add to cart |
//! | POST | `/create-payment-intent` | token | Stripe payment intent |
//!
//! The full table lives in [`routes::create_router`].

pub mod error;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use guard::{Caller, RoleGate};
pub use routes::create_router;
pub use state::{AppConfig, AppState, StorageBackend};
