//! # In-Memory Store
//!
//! `DocumentStore` backed by per-collection vectors behind a tokio `RwLock`.
//! Used for local development (`STORAGE_BACKEND=memory`) and tests.

use crate::document::{
    fields, strip_id, Collection, DeleteResult, Document, DocumentId, InsertOneResult,
    UpdateResult,
};
use crate::error::MarketResult;
use crate::filter::Filter;
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Insertion-ordered documents per collection
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> MarketResult<InsertOneResult> {
        let id = DocumentId::generate();
        let mut doc = strip_id(doc);
        doc.insert(fields::ID.to_string(), Value::String(id.to_string()));

        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc);

        debug!("memory insert into {}: {}", collection, id);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<Option<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> MarketResult<Vec<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> MarketResult<UpdateResult> {
        let set = strip_id(set);
        let mut guard = self.collections.write().await;
        let target = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));

        let Some(doc) = target else {
            return Ok(unmatched());
        };

        let mut modified = false;
        for (key, value) in set {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
        })
    }

    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        replacement: Document,
    ) -> MarketResult<UpdateResult> {
        let mut guard = self.collections.write().await;
        let target = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| filter.matches(d)));

        let Some(doc) = target else {
            return Ok(unmatched());
        };

        let mut next = strip_id(replacement);
        if let Some(id) = doc.get(fields::ID).cloned() {
            next.insert(fields::ID.to_string(), id);
        }
        let modified = *doc != next;
        *doc = next;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<DeleteResult> {
        let mut guard = self.collections.write().await;
        let deleted = match guard.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|d| filter.matches(d)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    async fn ping(&self) -> MarketResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn unmatched() -> UpdateResult {
    UpdateResult {
        acknowledged: true,
        matched_count: 0,
        modified_count: 0,
        upserted_id: None,
    }
}
