use crate::log::Logger;
use crate::state::TimestampStore;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Blocks the calling thread.
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Enforces a minimum delay between send attempts using a single persisted timestamp.
///
/// Every call to [`RateLimiter::acquire`] records a new timestamp, whether or not the
/// send that follows succeeds. The read-sleep-write sequence is serialized within the
/// process; separate processes sharing one timestamp file can still race each other.
pub struct RateLimiter {
    cooldown: Duration,
    store: Arc<dyn TimestampStore>,
    clock: Arc<dyn Clock>,
    gate: Mutex<()>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration, store: Arc<dyn TimestampStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cooldown,
            store,
            clock,
            gate: Mutex::new(()),
        }
    }

    /// Waits out whatever is left of the cooldown, then claims the next slot.
    ///
    /// Returns how long the calling thread was blocked.
    pub fn acquire(&self, log: &dyn Logger) -> Duration {
        let _guard = self.gate.lock().unwrap_or_else(|e| e.into_inner());

        let waited = match self.store.load() {
            Ok(Some(last)) => self.remaining(last),
            Ok(None) => Duration::ZERO,
            Err(e) => {
                log.warning(&format!("Unable to read last send time, not waiting: {:?}", e));
                Duration::ZERO
            }
        };

        if !waited.is_zero() {
            log.info(&format!(
                "Cooling down. Sleeping for {:.3} seconds.",
                waited.as_secs_f64()
            ));
            self.clock.sleep(waited);
        }

        if let Err(e) = self.store.store(self.clock.now()) {
            log.warning(&format!("Unable to record send time: {:?}", e));
        }

        waited
    }

    fn remaining(&self, last: DateTime<Utc>) -> Duration {
        // A timestamp from the future (clock moved backwards) waits out one full cooldown.
        let elapsed = (self.clock.now() - last).to_std().unwrap_or(Duration::ZERO);

        self.cooldown.saturating_sub(elapsed)
    }
}
