//! Round trips against a real MongoDB server.
//!
//! These need Docker and are ignored by default:
//! `cargo test -p rental-mongo -- --ignored`

use rental_core::{Collection, Document, DocumentStore, StoreError};
use rental_mongo::MongoStore;
use serde_json::{json, Value};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

async fn start_mongo(database: &str) -> (ContainerAsync<GenericImage>, MongoStore) {
    let container = GenericImage::new("mongo", "7.0")
        .with_exposed_port(27017.tcp())
        .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .unwrap();

    let port = container.get_host_port_ipv4(27017).await.unwrap();
    let uri = format!("mongodb://127.0.0.1:{}", port);
    let store = MongoStore::connect(&uri, database).await.unwrap();

    (container, store)
}

fn document(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn empty_collection_lists_as_empty() {
    let (_container, store) = start_mongo("rental_empty").await;

    assert!(store.list_all(Collection::Vehicles).await.unwrap().is_empty());
    assert!(store.list_all(Collection::Reservations).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn inserted_document_is_listed_with_hex_id() {
    let (_container, store) = start_mongo("rental_roundtrip").await;
    let vehicle = json!({
        "make": "Tesla",
        "model": "Model Y",
        "dailyRate": 95.5,
        "seats": 5,
        "available": true,
        "features": ["autopilot", "heated seats"],
        "location": { "city": "Almaty", "lot": "B2" }
    });

    let id = store
        .insert_one(Collection::Vehicles, document(vehicle.clone()))
        .await
        .unwrap();
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let vehicles = store.list_all(Collection::Vehicles).await.unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["_id"], json!(id));
    for (key, value) in vehicle.as_object().unwrap() {
        assert_eq!(&vehicles[0][key], value, "field {}", key);
    }

    assert!(store.list_all(Collection::Reservations).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn identical_documents_get_distinct_ids() {
    let (_container, store) = start_mongo("rental_distinct").await;
    let reservation = json!({ "vehicleId": "abc", "customer": "Ana" });

    let first = store
        .insert_one(Collection::Reservations, document(reservation.clone()))
        .await
        .unwrap();
    let second = store
        .insert_one(Collection::Reservations, document(reservation))
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(store.list_all(Collection::Reservations).await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_supplied_id_is_reported() {
    let (_container, store) = start_mongo("rental_duplicate").await;
    let vehicle = json!({ "_id": "EV-001", "make": "Kia" });

    let id = store
        .insert_one(Collection::Vehicles, document(vehicle.clone()))
        .await
        .unwrap();
    assert_eq!(id, "EV-001");

    let err = store
        .insert_one(Collection::Vehicles, document(vehicle))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(ref id) if id == "EV-001"));
    assert_eq!(store.list_all(Collection::Vehicles).await.unwrap().len(), 1);
}
