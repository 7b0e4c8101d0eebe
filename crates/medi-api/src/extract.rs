//! Extractors whose rejections render as `ApiError` JSON.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};
use medi_core::{Document, DocumentId, MarketError, MarketResult};

/// JSON body; malformed input becomes `InvalidInput`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters; malformed input becomes `InvalidInput`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

impl PathParam<String> {
    /// Interpret the parameter as a document key
    pub fn document_id(&self) -> MarketResult<DocumentId> {
        DocumentId::parse(&self.0)
    }
}

/// Reject update bodies that would set nothing
pub fn non_empty(doc: Document) -> MarketResult<Document> {
    let has_fields = doc.keys().any(|k| k != medi_core::fields::ID);
    if has_fields {
        Ok(doc)
    } else {
        Err(MarketError::invalid_input("update body must contain at least one field"))
    }
}
