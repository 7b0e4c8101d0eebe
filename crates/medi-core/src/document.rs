//! # Documents
//!
//! Schema-flexible documents, the collections that hold them, and the raw
//! result shapes returned by write operations.

use crate::error::{MarketError, MarketResult};
use serde::{Deserialize, Serialize};

/// A stored record. Field layout is owned by the client, not the server.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field names shared between handlers and filters
pub mod fields {
    pub const ID: &str = "_id";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const STATUS: &str = "status";
    pub const ADMIN_EMAIL: &str = "adminEmail";
    pub const SELLER_EMAIL: &str = "sellerEmail";
    pub const ADDER_EMAIL: &str = "addederEmail";
    pub const SELECTER_EMAIL: &str = "selecterEmail";
    pub const CATEGORY_NAME: &str = "categoryName";
    pub const DISCOUNT_PERCENTAGE: &str = "discountPercentage";
}

/// Payment status values compared by equality
pub mod status {
    pub const PAID: &str = "paid";
    pub const PENDING: &str = "pending";
}

/// The collections of the marketplace database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Categories,
    Medicines,
    Advertisements,
    Carts,
    Payments,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Categories,
        Collection::Medicines,
        Collection::Advertisements,
        Collection::Carts,
        Collection::Payments,
    ];

    /// Collection name in the database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Categories => "categories",
            Collection::Medicines => "medicines",
            Collection::Advertisements => "advertisements",
            Collection::Carts => "addToCarts",
            Collection::Payments => "payments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque document key: 24 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Parse an identifier taken from a URL path
    pub fn parse(raw: &str) -> MarketResult<Self> {
        if raw.len() != 24 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MarketError::invalid_input(format!(
                "'{}' is not a valid document id",
                raw
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        let mut hex = uuid::Uuid::new_v4().simple().to_string();
        hex.truncate(24);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove the key from a client-supplied body so writes never touch it
pub fn strip_id(mut doc: Document) -> Document {
    doc.remove(fields::ID);
    doc
}

/// Result of an insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

/// Result of an update or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
