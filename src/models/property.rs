use std::fmt;

use serde::{ Deserialize, Serialize };

use crate::models::common::{ PrincipalId, PropertyId, Timestamp };
use crate::models::will::WillOwners;

/// An ownable, time-bounded record held by the registry.
///
/// `Property::default()` is the zero value. It is what an absent or deleted
/// id reads as, and there is no separate existence flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub kind: String,
    pub price: u128,
    pub value: u128,
    pub location: String,
    pub description: String,
    pub expiry: Timestamp,
    pub last_renewal: Timestamp,
    pub owner: PrincipalId,
    pub beneficiary: PrincipalId,
    #[serde(default)]
    pub will_owners: WillOwners,
}

impl Property {
    /// Builds a freshly issued record owned by `owner`
    pub fn issue(id: PropertyId, owner: PrincipalId, details: NewProperty, now: Timestamp) -> Self {
        Property {
            id,
            name: details.name,
            kind: details.kind,
            price: details.price,
            value: details.value,
            location: details.location,
            description: details.description,
            expiry: details.expiry,
            last_renewal: now,
            owner,
            beneficiary: details.beneficiary,
            will_owners: WillOwners::new(),
        }
    }

    pub fn is_owned_by(&self, caller: &PrincipalId) -> bool {
        !self.owner.is_unset() && &self.owner == caller
    }

    /// `expiry < now`
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiry < now
    }

    /// `expiry > now`
    pub fn is_renewable_at(&self, now: Timestamp) -> bool {
        self.expiry > now
    }

    /// `last_renewal + threshold < now`. An overflowing sum is never eligible.
    pub fn is_auto_transfer_eligible_at(&self, now: Timestamp, threshold_secs: u64) -> bool {
        match self.last_renewal.checked_add_secs(threshold_secs) {
            Some(deadline) => deadline < now,
            None => false,
        }
    }

    pub fn standing_at(&self, now: Timestamp, threshold_secs: u64) -> Standing {
        let expiry = if self.is_expired_at(now) {
            ExpiryStanding::Expired
        } else if self.is_renewable_at(now) {
            ExpiryStanding::Active
        } else {
            ExpiryStanding::ExpiresNow
        };
        Standing {
            id: self.id,
            expiry,
            auto_transfer_eligible: self.is_auto_transfer_eligible_at(now, threshold_secs),
            evaluated_at: now,
        }
    }

    pub fn details(&self) -> PropertyDetails {
        PropertyDetails::from(self)
    }
}

/// Caller-supplied fields for a new record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub kind: String,
    pub price: u128,
    pub value: u128,
    pub location: String,
    pub description: String,
    pub expiry: Timestamp,
    pub beneficiary: PrincipalId,
}

/// Everything about a record except its will owners
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub name: String,
    pub kind: String,
    pub price: u128,
    pub value: u128,
    pub location: String,
    pub description: String,
    pub expiry: Timestamp,
    pub last_renewal: Timestamp,
    pub owner: PrincipalId,
    pub beneficiary: PrincipalId,
}

impl PropertyDetails {
    /// True when every field holds its zero value, i.e. the id is unused or deleted
    pub fn is_vacant(&self) -> bool {
        *self == PropertyDetails::default()
    }
}

impl From<&Property> for PropertyDetails {
    fn from(property: &Property) -> Self {
        PropertyDetails {
            name: property.name.clone(),
            kind: property.kind.clone(),
            price: property.price,
            value: property.value,
            location: property.location.clone(),
            description: property.description.clone(),
            expiry: property.expiry,
            last_renewal: property.last_renewal,
            owner: property.owner.clone(),
            beneficiary: property.beneficiary.clone(),
        }
    }
}

/// Where a record's expiry sits relative to a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryStanding {
    Active,     // expiry > now, renewable
    ExpiresNow, // expiry == now, neither expired nor renewable
    Expired,    // expiry < now
}

/// Classification of a record derived from its timestamps at `evaluated_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: PropertyId,
    pub expiry: ExpiryStanding,
    pub auto_transfer_eligible: bool,
    pub evaluated_at: Timestamp,
}

impl fmt::Display for ExpiryStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStanding::Active => write!(f, "Active"),
            ExpiryStanding::ExpiresNow => write!(f, "Expires now"),
            ExpiryStanding::Expired => write!(f, "Expired"),
        }
    }
}
