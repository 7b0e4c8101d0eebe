//! Shared fixtures for the HTTP tests: an in-memory app with a counting
//! store and a recording payment provider.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use medi_api::{create_router, AppConfig, AppState};
use medi_core::{
    Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult, MarketError,
    MarketResult, MemoryStore, PaymentIntent, PaymentIntentProvider, PaymentIntentRequest,
    UpdateResult,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// `MemoryStore` that counts every storage operation
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    ops: AtomicUsize,
}

impl CountingStore {
    pub fn operations(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.ops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn insert_one(
        &self,
        collection: Collection,
        doc: Document,
    ) -> MarketResult<InsertOneResult> {
        self.tick();
        self.inner.insert_one(collection, doc).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<Option<Document>> {
        self.tick();
        self.inner.find_one(collection, filter).await
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> MarketResult<Vec<Document>> {
        self.tick();
        self.inner.find(collection, filter).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> MarketResult<UpdateResult> {
        self.tick();
        self.inner.update_one(collection, filter, set).await
    }

    async fn replace_one(
        &self,
        collection: Collection,
        filter: &Filter,
        replacement: Document,
    ) -> MarketResult<UpdateResult> {
        self.tick();
        self.inner.replace_one(collection, filter, replacement).await
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> MarketResult<DeleteResult> {
        self.tick();
        self.inner.delete_one(collection, filter).await
    }

    async fn ping(&self) -> MarketResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "counting-memory"
    }
}

/// Payment provider that records requests instead of calling out
#[derive(Default)]
pub struct RecordingProvider {
    pub requests: Mutex<Vec<PaymentIntentRequest>>,
    pub fail: bool,
}

impl RecordingProvider {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentIntentProvider for RecordingProvider {
    async fn create_intent(&self, request: &PaymentIntentRequest) -> MarketResult<PaymentIntent> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(MarketError::upstream("stripe", "card_declined"));
        }

        Ok(PaymentIntent {
            id: "pi_test_1".to_string(),
            client_secret: "pi_test_1_secret_abc".to_string(),
            amount: request.amount,
            currency: request.currency,
            status: "requires_payment_method".to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<CountingStore>,
    pub payments: Arc<RecordingProvider>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(RecordingProvider::default())
    }

    pub fn with_provider(provider: RecordingProvider) -> Self {
        Self::build(provider, None)
    }

    /// App that only admits the given comma-separated CORS origins
    pub fn with_allowed_origins(origins: &str) -> Self {
        Self::build(RecordingProvider::default(), Some(origins.to_string()))
    }

    fn build(provider: RecordingProvider, origins: Option<String>) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "ACCESS_TOKEN_SECRET" => Some("test-secret".to_string()),
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "ALLOWED_ORIGINS" => origins.clone(),
            _ => None,
        })
        .unwrap();

        let store = Arc::new(CountingStore::default());
        let payments = Arc::new(provider);
        let state = AppState::new(config, store.clone(), payments.clone()).unwrap();
        let server = TestServer::new(create_router(state)).unwrap();

        Self {
            server,
            store,
            payments,
        }
    }

    /// Insert a user document directly, bypassing the API
    pub async fn seed_user(&self, email: &str, role: &str) {
        let user = json!({ "email": email, "name": "Test", "role": role });
        self.store
            .inner
            .insert_one(Collection::Users, as_document(user))
            .await
            .unwrap();
    }

    /// Issue a token through `POST /jwt`
    pub async fn token_for(&self, email: &str) -> String {
        let response = self
            .server
            .post("/jwt")
            .json(&json!({ "email": email }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Seed a user with a role and return their token
    pub async fn login(&self, email: &str, role: &str) -> String {
        self.seed_user(email, role).await;
        self.token_for(email).await
    }
}

pub fn as_document(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}
