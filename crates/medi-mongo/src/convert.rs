//! # BSON / JSON Conversion
//!
//! Documents cross the store boundary as JSON objects. Object ids are
//! rendered as plain 24-hex strings, dates as RFC 3339 strings.

use medi_core::{fields, Condition, Document, DocumentId, Filter, MarketError, MarketResult};
use mongodb::bson::{self, doc, oid::ObjectId, Bson};
use serde_json::Value;

/// Client JSON body to a BSON document
pub fn to_bson_document(doc: &Document) -> MarketResult<bson::Document> {
    bson::to_document(doc)
        .map_err(|e| MarketError::invalid_input(format!("document cannot be stored: {}", e)))
}

/// Stored BSON document to client JSON
pub fn from_bson_document(doc: bson::Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(inner) => Value::Object(from_bson_document(inner)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Key returned by an insert
pub fn document_id(value: &Bson) -> MarketResult<DocumentId> {
    match value {
        Bson::ObjectId(oid) => DocumentId::parse(&oid.to_hex()),
        other => Err(MarketError::Internal(format!(
            "unexpected inserted id: {}",
            other
        ))),
    }
}

/// Equality filter to a MongoDB query document
pub fn to_query(filter: &Filter) -> MarketResult<bson::Document> {
    let mut query = bson::Document::new();
    for (field, condition) in filter.clauses() {
        let (value, negate) = match condition {
            Condition::Eq(v) => (v, false),
            Condition::Ne(v) => (v, true),
        };
        let value = if field == fields::ID {
            id_to_bson(value)?
        } else {
            bson::to_bson(value)
                .map_err(|e| MarketError::invalid_input(format!("bad filter value: {}", e)))?
        };

        if negate {
            query.insert(field.clone(), doc! { "$ne": value });
        } else {
            query.insert(field.clone(), value);
        }
    }
    Ok(query)
}

fn id_to_bson(value: &Value) -> MarketResult<Bson> {
    let raw = value
        .as_str()
        .ok_or_else(|| MarketError::invalid_input("document id must be a string"))?;
    ObjectId::parse_str(raw)
        .map(Bson::ObjectId)
        .map_err(|_| MarketError::invalid_input(format!("'{}' is not a valid document id", raw)))
}
