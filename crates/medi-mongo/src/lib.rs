//! # medi-mongo
//!
//! MongoDB document store for the MediSnap API.
//!
//! ```rust,ignore
//! use medi_mongo::MongoStore;
//!
//! let store = MongoStore::connect("mongodb://localhost:27017", "MediSnap").await?;
//! let users = store.find(Collection::Users, &Filter::all()).await?;
//! ```

pub mod convert;
pub mod store;

pub use store::MongoStore;

/// Build an Atlas connection string from separate credentials
pub fn atlas_uri(user: &str, password: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=medisnap",
        user, password, host
    )
}
