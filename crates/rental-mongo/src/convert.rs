//! # BSON ↔ JSON
//!
//! Documents arrive as JSON objects and are stored as BSON. On the way back
//! out, ObjectIds are rendered as plain hex strings; all other values use
//! relaxed extended JSON.

use mongodb::bson::{Bson, Document as BsonDocument};
use rental_core::{Document, StoreError, StoreResult};
use serde_json::Value;

/// Convert a wire document into BSON for insertion.
pub fn json_to_document(document: Document) -> StoreResult<BsonDocument> {
    BsonDocument::try_from(document).map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

/// Convert a stored document back into its wire form.
pub fn document_to_json(document: BsonDocument) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Render an inserted id as a string
pub fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}
