//! MongoDB connection and document store implementation
//!
//! Works against MongoDB and MongoDB-compatible services such as Cosmos DB.
//!
//! # Example
//!
//! ```rust,no_run
//! use rental_mongo::{MongoStore, DATABASE_NAME};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MongoStore::connect("mongodb://localhost:27017", DATABASE_NAME).await?;
//! # Ok(())
//! # }
//! ```

use crate::convert::{document_to_json, id_to_string, json_to_document};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document as BsonDocument};
use mongodb::error::{Error as MongoError, ErrorKind, WriteError, WriteFailure};
use mongodb::{Client, Database};
use rental_core::{
    Collection, ConnectionError, Document, DocumentStore, StoreError, StoreResult, ID_FIELD,
};
use tracing::debug;

/// Database used by the rental backend
pub const DATABASE_NAME: &str = "altoevRentalDB";

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    )
}

/// MongoDB-backed document store bound to one database
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database_name: String,
}

impl MongoStore {
    /// Connect and verify the server answers a `ping`.
    ///
    /// The driver connects lazily, so the ping is what surfaces an
    /// unreachable server at startup instead of on the first request.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, ConnectionError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| ConnectionError::Store(e.to_string()))?;

        let store = Self {
            client,
            database_name: database_name.to_string(),
        };

        store
            .database()
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ConnectionError::Store(format!("ping failed: {}", e)))?;

        Ok(store)
    }

    /// Get the MongoDB database instance
    pub fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let coll = self.database().collection::<BsonDocument>(collection.name());

        let cursor = coll
            .find(doc! {})
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let documents: Vec<BsonDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!("Fetched {} documents from {}", documents.len(), collection);

        Ok(documents.into_iter().map(document_to_json).collect())
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<String> {
        let document = json_to_document(document)?;
        let supplied_id = document.get(ID_FIELD).cloned();
        let coll = self.database().collection::<BsonDocument>(collection.name());

        let result = coll.insert_one(document).await.map_err(|e| match supplied_id {
            Some(id) if is_duplicate_key(&e) => StoreError::DuplicateId(id_to_string(id)),
            _ => StoreError::Write(e.to_string()),
        })?;

        Ok(id_to_string(result.inserted_id))
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
