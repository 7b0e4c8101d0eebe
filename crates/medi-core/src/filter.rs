//! # Filters
//!
//! Equality filters over one or two document attributes. Storage backends
//! translate these into their own query language; the in-memory store
//! evaluates them directly via [`Filter::matches`].

use crate::document::{fields, Document, DocumentId};
use serde_json::Value;

/// A single field condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals value (a `null` value also matches a missing field)
    Eq(Value),
    /// Field does not equal value (a missing field matches)
    Ne(Value),
}

impl Condition {
    fn holds(&self, actual: Option<&Value>) -> bool {
        match self {
            Condition::Eq(expected) => equals(actual, expected),
            Condition::Ne(expected) => !equals(actual, expected),
        }
    }
}

fn equals(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        Some(v) => v == expected,
        None => expected.is_null(),
    }
}

/// Conjunction of field conditions; empty matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    /// Match every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the document with the given key
    pub fn by_id(id: &DocumentId) -> Self {
        Self::all().eq(fields::ID, id.as_str())
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Condition::Eq(value.into())));
        self
    }

    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Condition::Ne(value.into())));
        self
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, cond)| cond.holds(doc.get(field)))
    }
}
