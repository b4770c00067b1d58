use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;

use chrono::Utc;

use crate::models::common::Timestamp;
use crate::traits::clock::Clock;

/// Wall clock in UTC. Instants before the Unix epoch read as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(u64::try_from(Utc::now().timestamp()).unwrap_or(0))
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to the registry.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(start: Timestamp) -> Self {
        ManualClock {
            secs: Arc::new(AtomicU64::new(start.as_secs())),
        }
    }

    /// Moves the clock forward by `secs`, stopping at the largest instant
    pub fn advance(&self, secs: u64) -> Timestamp {
        let previous = self.secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(secs))
            })
            .unwrap_or_else(|current| current);
        Timestamp(previous.saturating_add(secs))
    }

    /// Moves the clock to `to`. Earlier instants are ignored.
    pub fn advance_to(&self, to: Timestamp) -> Timestamp {
        let previous = self.secs.fetch_max(to.as_secs(), Ordering::SeqCst);
        Timestamp(previous.max(to.as_secs()))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::SeqCst))
    }
}
