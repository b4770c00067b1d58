use std::collections::BTreeMap;

use serde::{ Deserialize, Serialize };

use crate::models::common::PropertyId;
use crate::models::property::Property;

/// Durable image of the registry: the id sequence plus every live record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Highest id ever issued. Never decreases, even when records are deleted.
    pub last_issued_id: u64,
    pub properties: Vec<Property>,
}

impl RegistrySnapshot {
    pub fn from_records(last_issued_id: u64, records: &BTreeMap<PropertyId, Property>) -> Self {
        RegistrySnapshot {
            last_issued_id,
            properties: records.values().cloned().collect(),
        }
    }

    /// Indexes the records by id, dropping zero-valued and out-of-range entries
    pub fn into_records(self) -> BTreeMap<PropertyId, Property> {
        let last = self.last_issued_id;
        self.properties
            .into_iter()
            .filter(|p| !p.id.is_unset() && p.id.0 <= last)
            .map(|p| (p.id, p))
            .collect()
    }
}
