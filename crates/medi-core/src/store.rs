//! # Document Store Trait
//!
//! Storage seam for the marketplace. Handlers and guards only ever talk to a
//! `DocumentStore`; the concrete backend is chosen at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   DocumentStore (trait)                     │
//! │  ├── insert_one() / find_one() / find()                     │
//! │  ├── update_one() / replace_one() / delete_one()            │
//! │  └── ping() / close()                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!               ┌────────────┴────────────┐
//!       ┌───────┴───────┐         ┌───────┴───────┐
//!       │  MongoStore   │         │  MemoryStore  │
//!       │ (medi-mongo)  │         │ (dev / tests) │
//!       └───────────────┘         └───────────────┘
//! ```

use crate::document::{Collection, DeleteResult, Document, InsertOneResult, UpdateResult};
use crate::error::MarketResult;
use crate::filter::Filter;
use async_trait::async_trait;
use std::sync::Arc;

/// One storage operation per call; no transactions, no joins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its generated key.
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> MarketResult<InsertOneResult>;

    /// First document matching the filter, if any.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<Option<Document>>;

    /// All documents matching the filter, in storage order.
    async fn find(&self, collection: Collection, filter: &Filter) -> MarketResult<Vec<Document>>;

    /// `$set` the given fields on the first matching document.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> MarketResult<UpdateResult>;

    /// Replace the first matching document, keeping its key.
    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        replacement: Document,
    ) -> MarketResult<UpdateResult>;

    /// Delete the first matching document.
    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<DeleteResult>;

    /// Round-trip to the backend (health checks).
    async fn ping(&self) -> MarketResult<()>;

    /// Release backend resources on shutdown.
    async fn close(&self) {}

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared store handle (dynamic dispatch)
pub type BoxedDocumentStore = Arc<dyn DocumentStore>;
