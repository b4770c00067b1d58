use serde::{ Deserialize, Serialize };

use crate::models::common::PrincipalId;

/// Principals named in a property's will.
///
/// This is a bag rather than a set: the same principal may be added more than
/// once and every addition is kept. Removal takes out the first match only and
/// moves the last entry into its slot, so the stored order is not stable
/// across removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WillOwners(Vec<PrincipalId>);

impl WillOwners {
    pub fn new() -> Self {
        WillOwners(Vec::new())
    }

    /// Appends `principal` without checking for an existing entry
    pub fn add(&mut self, principal: PrincipalId) {
        self.0.push(principal);
    }

    /// Removes the first occurrence of `principal`.
    ///
    /// Returns `false` and leaves the bag untouched when it is absent.
    pub fn remove_first(&mut self, principal: &PrincipalId) -> bool {
        match self.0.iter().position(|p| p == principal) {
            Some(index) => {
                self.0.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, principal: &PrincipalId) -> bool {
        self.0.iter().any(|p| p == principal)
    }

    /// Number of entries equal to `principal`
    pub fn occurrences(&self, principal: &PrincipalId) -> usize {
        self.0.iter().filter(|p| *p == principal).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PrincipalId] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<PrincipalId> {
        self.0.clone()
    }
}

impl From<Vec<PrincipalId>> for WillOwners {
    fn from(value: Vec<PrincipalId>) -> Self {
        WillOwners(value)
    }
}
