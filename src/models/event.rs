use std::fmt;

use serde::{ Deserialize, Serialize };

use crate::models::common::{ PrincipalId, PropertyId };

/// Notification written to the event sink after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    PropertyAdded {
        id: PropertyId,
        owner: PrincipalId,
    },
    PropertyTransferred {
        id: PropertyId,
        from: PrincipalId,
        to: PrincipalId,
    },
    PropertyExpired {
        id: PropertyId,
    },
    PropertyDeleted {
        id: PropertyId,
    },
    WillOwnerAdded {
        id: PropertyId,
        will_owner: PrincipalId,
    },
    WillOwnerRemoved {
        id: PropertyId,
        will_owner: PrincipalId,
    },
    PropertyRenewed {
        id: PropertyId,
    },
    // Reserved. No operation transfers ownership by will.
    OwnershipTransferredByWill {
        id: PropertyId,
        from: PrincipalId,
        to: PrincipalId,
    },
}

impl RegistryEvent {
    pub fn property_id(&self) -> PropertyId {
        match self {
            RegistryEvent::PropertyAdded { id, .. }
            | RegistryEvent::PropertyTransferred { id, .. }
            | RegistryEvent::PropertyExpired { id }
            | RegistryEvent::PropertyDeleted { id }
            | RegistryEvent::WillOwnerAdded { id, .. }
            | RegistryEvent::WillOwnerRemoved { id, .. }
            | RegistryEvent::PropertyRenewed { id }
            | RegistryEvent::OwnershipTransferredByWill { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::PropertyAdded { .. } => "PropertyAdded",
            RegistryEvent::PropertyTransferred { .. } => "PropertyTransferred",
            RegistryEvent::PropertyExpired { .. } => "PropertyExpired",
            RegistryEvent::PropertyDeleted { .. } => "PropertyDeleted",
            RegistryEvent::WillOwnerAdded { .. } => "WillOwnerAdded",
            RegistryEvent::WillOwnerRemoved { .. } => "WillOwnerRemoved",
            RegistryEvent::PropertyRenewed { .. } => "PropertyRenewed",
            RegistryEvent::OwnershipTransferredByWill { .. } => "OwnershipTransferredByWill",
        }
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::PropertyAdded { id, owner } => {
                write!(f, "PropertyAdded({}, owner={})", id, owner)
            }
            RegistryEvent::PropertyTransferred { id, from, to }
            | RegistryEvent::OwnershipTransferredByWill { id, from, to } => {
                write!(f, "{}({}, from={}, to={})", self.kind(), id, from, to)
            }
            RegistryEvent::PropertyExpired { id }
            | RegistryEvent::PropertyDeleted { id }
            | RegistryEvent::PropertyRenewed { id } => write!(f, "{}({})", self.kind(), id),
            RegistryEvent::WillOwnerAdded { id, will_owner }
            | RegistryEvent::WillOwnerRemoved { id, will_owner } => {
                write!(f, "{}({}, will_owner={})", self.kind(), id, will_owner)
            }
        }
    }
}
