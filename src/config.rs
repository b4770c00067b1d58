use crate::models::common::SECONDS_PER_DAY;

/// Default time after the last renewal before anyone may trigger auto-transfer
pub const DEFAULT_AUTO_TRANSFER_DAYS: u64 = 365;

/// Runtime options for the property registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Seconds that must elapse after `last_renewal` before auto-transfer is allowed
    pub auto_transfer_after_secs: u64,
}

impl RegistryOptions {
    pub fn with_auto_transfer_days(days: u64) -> Self {
        RegistryOptions {
            auto_transfer_after_secs: days.saturating_mul(SECONDS_PER_DAY),
        }
    }
}

impl Default for RegistryOptions {
    fn default() -> Self {
        RegistryOptions::with_auto_transfer_days(DEFAULT_AUTO_TRANSFER_DAYS)
    }
}
