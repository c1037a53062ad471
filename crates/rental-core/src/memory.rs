//! # In-Memory Document Store
//!
//! A `DocumentStore` backed by a map of vectors. Used by the API tests, and by
//! the server when started with `DOCUMENT_STORE=memory`.

use crate::document::{Collection, Document, ID_FIELD};
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local document store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in a collection
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

/// 24 lowercase hex chars, the same width as an ObjectId
fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> StoreResult<String> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        let id = match document.get(ID_FIELD) {
            Some(existing) => {
                if documents.iter().any(|d| d.get(ID_FIELD) == Some(existing)) {
                    return Err(StoreError::DuplicateId(id_to_string(existing)));
                }
                id_to_string(existing)
            }
            None => {
                let id = generate_id();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        documents.push(document);
        Ok(id)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
