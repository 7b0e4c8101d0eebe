//! # Application State
//!
//! Shared state for the Axum application.
//! Contains configuration, the token service, the document store handle and
//! the payment provider. Everything is constructed once at startup and
//! injected into handlers and guards.

use medi_core::{
    BoxedDocumentStore, BoxedPaymentIntentProvider, MarketError, MarketResult, MemoryStore,
    TokenService,
};
use medi_mongo::{atlas_uri, MongoStore};
use medi_stripe::StripePaymentIntentStrategy;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Which `DocumentStore` backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(MarketError::Configuration(format!(
                "unknown STORAGE_BACKEND '{}', expected 'mongodb' or 'memory'",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
    /// HS256 secret for access tokens
    pub token_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: i64,
    /// Storage backend
    pub storage: StorageBackend,
    /// MongoDB connection string
    pub mongodb_uri: Option<String>,
    /// MongoDB database name
    pub db_name: String,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> MarketResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> MarketResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| MarketError::Configuration(format!("PORT '{}' is not a port", p)))?,
            None => 8000,
        };

        let token_ttl_secs = match var("TOKEN_TTL_SECS") {
            Some(t) => t.parse().map_err(|_| {
                MarketError::Configuration(format!("TOKEN_TTL_SECS '{}' is not a number", t))
            })?,
            None => 3600,
        };

        let token_secret = var("ACCESS_TOKEN_SECRET").ok_or_else(|| {
            MarketError::Configuration("ACCESS_TOKEN_SECRET not set".to_string())
        })?;

        let storage = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::MongoDb,
        };

        let mongodb_uri = var("MONGODB_URI").or_else(|| {
            match (var("DB_USER"), var("DB_PASS"), var("DB_HOST")) {
                (Some(user), Some(pass), Some(host)) => Some(atlas_uri(&user, &pass, &host)),
                _ => None,
            }
        });

        if storage == StorageBackend::MongoDb && mongodb_uri.is_none() {
            return Err(MarketError::Configuration(
                "MONGODB_URI or DB_USER/DB_PASS/DB_HOST must be set".to_string(),
            ));
        }

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            allowed_origins,
            token_secret,
            token_ttl_secs,
            storage,
            mongodb_uri,
            db_name: var("DB_NAME").unwrap_or_else(|| "MediSnap".to_string()),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> MarketResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                MarketError::Configuration(format!(
                    "invalid socket address {}:{}",
                    self.host, self.port
                ))
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("allowed_origins", &self.allowed_origins)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("storage", &self.storage)
            .field("db_name", &self.db_name)
            .finish_non_exhaustive()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: Arc<AppConfig>,
    /// Access token signer/verifier
    pub tokens: Arc<TokenService>,
    /// Document store handle
    pub store: BoxedDocumentStore,
    /// Payment-intent provider
    pub payments: BoxedPaymentIntentProvider,
}

impl AppState {
    /// Assemble state from explicit collaborators
    pub fn new(
        config: AppConfig,
        store: BoxedDocumentStore,
        payments: BoxedPaymentIntentProvider,
    ) -> MarketResult<Self> {
        let tokens = TokenService::new(&config.token_secret, config.token_ttl_secs)?;

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            store,
            payments,
        })
    }

    /// Load config, open the store and initialise Stripe
    pub async fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let store: BoxedDocumentStore = match config.storage {
            StorageBackend::MongoDb => {
                let uri = config.mongodb_uri.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("MongoDB backend selected without a connection string")
                })?;
                Arc::new(MongoStore::connect(uri, &config.db_name).await?)
            }
            StorageBackend::Memory => {
                warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let stripe = StripePaymentIntentStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        info!("Stripe config: {:?}", stripe.config());

        Ok(Self::new(config, store, Arc::new(stripe))?)
    }
}
