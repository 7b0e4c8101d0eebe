//! # medi-core
//!
//! Core types and traits for the MediSnap marketplace API.
//!
//! This crate provides:
//! - `DocumentStore` trait for storage backends, and the in-memory `MemoryStore`
//! - `Document`, `Collection`, `Filter` and the raw write-result shapes
//! - `TokenService` and `Claims` for bearer-token auth
//! - `Role` for role guards
//! - `PaymentIntentProvider` trait for payment processors
//! - `MarketError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use medi_core::{fields, Collection, DocumentStore, Filter, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let result = store.insert_one(Collection::Medicines, medicine).await?;
//!
//! let mine = store
//!     .find(Collection::Medicines, &Filter::all().eq(fields::ADDER_EMAIL, "s@x.com"))
//!     .await?;
//! ```

pub mod document;
pub mod error;
pub mod filter;
pub mod memory;
pub mod payment;
pub mod role;
pub mod store;
pub mod token;

// Re-exports for convenience
pub use document::{
    fields, status, strip_id, Collection, DeleteResult, Document, DocumentId, InsertOneResult,
    UpdateResult,
};
pub use error::{MarketError, MarketResult};
pub use filter::{Condition, Filter};
pub use memory::MemoryStore;
pub use payment::{
    amount_from_price, BoxedPaymentIntentProvider, Currency, PaymentIntent,
    PaymentIntentProvider, PaymentIntentRequest,
};
pub use role::Role;
pub use store::{BoxedDocumentStore, DocumentStore};
pub use token::{Claims, TokenService};
