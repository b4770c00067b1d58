use std::path::PathBuf;

use thiserror::Error;

use crate::models::common::{ PrincipalId, PropertyId, Timestamp };

/// Custom error types for the property registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{caller} is not the owner of property {id}")]
    Unauthorized { id: PropertyId, caller: PrincipalId },

    #[error("Property {id} has not expired yet (expiry {expiry}, now {now})")]
    NotYetExpired { id: PropertyId, expiry: Timestamp, now: Timestamp },

    #[error("Expiry {requested} for property {id} is not after the current time {now}")]
    InvalidExpiry { id: PropertyId, requested: Timestamp, now: Timestamp },

    #[error("Property {id} is not eligible for auto-transfer until after {eligible_after}")]
    NotEligible { id: PropertyId, eligible_after: Timestamp },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("State file {} is in use by another process", .0.display())]
    StoreLocked(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Registry lock poisoned by a panicked operation")]
    LockPoisoned,
}

/// Result type specific to registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Fatal,
    Error,
    Warning,
    Info,
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
    fn severity(&self) -> ErrorSeverity;
}

impl RecoverableError for RegistryError {
    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::NotYetExpired { .. } |
                RegistryError::InvalidExpiry { .. } |
                RegistryError::NotEligible { .. } |
                RegistryError::StoreLocked(_)
        )
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            RegistryError::Unauthorized { .. } => None,
            RegistryError::NotYetExpired { expiry, .. } => {
                Some(format!("Retry after {}, or delete the property instead", expiry))
            }
            RegistryError::InvalidExpiry { now, .. } => {
                Some(format!("Choose an expiry later than {}", now))
            }
            RegistryError::NotEligible { eligible_after, .. } => {
                Some(format!("Retry after {}", eligible_after))
            }
            RegistryError::Storage(_) => Some("Check that the state file is writable".to_string()),
            RegistryError::StoreLocked(_) => {
                Some("Retry once the other estate process has finished".to_string())
            }
            RegistryError::Serialization(_) => {
                Some("The state file may be corrupt; restore it from a backup".to_string())
            }
            RegistryError::LockPoisoned => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::NotYetExpired { .. } |
            RegistryError::InvalidExpiry { .. } |
            RegistryError::NotEligible { .. } |
            RegistryError::StoreLocked(_) => ErrorSeverity::Warning,
            RegistryError::Unauthorized { .. } => ErrorSeverity::Error,
            RegistryError::Storage(_) | RegistryError::Serialization(_) => ErrorSeverity::Error,
            RegistryError::LockPoisoned => ErrorSeverity::Fatal,
        }
    }
}
