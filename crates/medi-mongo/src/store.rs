//! # MongoDB Store
//!
//! `DocumentStore` over a single long-lived MongoDB client. The driver owns
//! connection pooling; every trait call is exactly one driver operation.

use crate::convert::{document_id, from_bson_document, to_bson_document, to_query};
use async_trait::async_trait;
use futures::TryStreamExt;
use medi_core::{
    strip_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    MarketError, MarketResult, UpdateResult,
};
use mongodb::bson::{self, doc};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database};
use tracing::{debug, info, instrument};

const SERVICE: &str = "mongodb";

fn upstream(err: mongodb::error::Error) -> MarketError {
    MarketError::upstream(SERVICE, err.to_string())
}

/// MongoDB-backed document store
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect and verify the deployment answers a ping.
    pub async fn connect(uri: &str, db_name: &str) -> MarketResult<Self> {
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            MarketError::Configuration(format!("invalid MongoDB connection string: {}", e))
        })?;
        options.app_name = Some("medisnap".to_string());
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

        let client = Client::with_options(options).map_err(upstream)?;
        let store = Self::from_client(client, db_name);
        store.ping().await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(store)
    }

    /// Wrap an existing client
    pub fn from_client(client: Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        Self { client, db }
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<bson::Document> {
        self.db.collection::<bson::Document>(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip_all, fields(collection = %collection))]
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> MarketResult<InsertOneResult> {
        let stored = to_bson_document(&strip_id(doc))?;
        let result = self
            .collection(collection)
            .insert_one(stored, None)
            .await
            .map_err(upstream)?;

        let inserted_id = document_id(&result.inserted_id)?;
        debug!("inserted {}", inserted_id);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id,
        })
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(to_query(filter)?, None)
            .await
            .map_err(upstream)?;
        Ok(found.map(from_bson_document))
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn find(&self, collection: Collection, filter: &Filter) -> MarketResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(to_query(filter)?, None)
            .await
            .map_err(upstream)?;

        let docs: Vec<bson::Document> = cursor.try_collect().await.map_err(upstream)?;
        debug!("found {} documents", docs.len());
        Ok(docs.into_iter().map(from_bson_document).collect())
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> MarketResult<UpdateResult> {
        let set = to_bson_document(&strip_id(set))?;
        let result = self
            .collection(collection)
            .update_one(to_query(filter)?, doc! { "$set": set }, None)
            .await
            .map_err(upstream)?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(document_id).transpose()?,
        })
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        replacement: Document,
    ) -> MarketResult<UpdateResult> {
        let replacement = to_bson_document(&strip_id(replacement))?;
        let result = self
            .collection(collection)
            .replace_one(to_query(filter)?, replacement, None)
            .await
            .map_err(upstream)?;

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(document_id).transpose()?,
        })
    }

    #[instrument(skip_all, fields(collection = %collection))]
    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<DeleteResult> {
        let result = self
            .collection(collection)
            .delete_one(to_query(filter)?, None)
            .await
            .map_err(upstream)?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> MarketResult<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(upstream)
    }

    async fn close(&self) {
        info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }

    fn backend_name(&self) -> &'static str {
        SERVICE
    }
}
