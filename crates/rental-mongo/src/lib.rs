//! # rental-mongo
//!
//! `DocumentStore` implementation on the official MongoDB driver.
//!
//! - [`MongoStore`] holds one client and one database handle for the
//!   process lifetime; the driver pools connections internally.
//! - [`convert`] maps wire JSON to BSON and back.

pub mod connection;
pub mod convert;

pub use connection::{MongoStore, DATABASE_NAME};
