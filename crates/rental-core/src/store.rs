//! # Document Store Trait
//!
//! The two operations the HTTP layer needs from a document database.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │          DocumentStore (trait)            │
//! │  ├── list_all()                           │
//! │  ├── insert_one()                         │
//! │  └── backend_name()                       │
//! └───────────────────────────────────────────┘
//!                      ▲
//!          ┌───────────┴───────────┐
//!  ┌───────┴───────┐       ┌───────┴───────┐
//!  │  MongoStore   │       │ InMemoryStore │
//!  │(rental-mongo) │       │ (tests, dev)  │
//!  └───────────────┘       └───────────────┘
//! ```

use crate::document::{Collection, Document};
use crate::error::StoreResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A handle to a single named database.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in the collection, in store-native order.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Store the document verbatim and return its generated identifier.
    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<String>;

    /// Backend name (for logging and health reporting).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared document store (dynamic dispatch)
pub type BoxedDocumentStore = Arc<dyn DocumentStore>;
