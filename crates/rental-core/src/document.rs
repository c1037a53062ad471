//! # Documents and Collections
//!
//! Vehicles and reservations are schema-less JSON objects. The backend never
//! inspects their fields; it only knows which collection they live in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A schema-less record as it travels over the wire
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Key under which the store-assigned identifier lives
pub const ID_FIELD: &str = "_id";

/// Named collections exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Rental vehicles
    Vehicles,
    /// Bookings
    Reservations,
}

impl Collection {
    /// Collection name in the document store
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles",
            Collection::Reservations => "reservations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Vehicles.name(), "vehicles");
        assert_eq!(Collection::Reservations.to_string(), "reservations");
    }
}
