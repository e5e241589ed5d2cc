//! Wall clock that the lifecycle binder can freeze.

use std::sync::RwLock;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Offset;
use chrono::Utc;
use tracing::debug;

use crate::common::rwlock_read_or_recover;
use crate::common::rwlock_write_or_recover;
use crate::usecases::ports::Clock;
use crate::usecases::ports::FreezableClock;

pub struct MockableClock {
    zone: FixedOffset,
    frozen: RwLock<Option<(DateTime<Utc>, FixedOffset)>>,
}

impl Default for MockableClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockableClock {
    /// Reads the system time in UTC until frozen.
    pub fn new() -> Self {
        Self::with_zone(Utc.fix())
    }

    pub fn with_zone(zone: FixedOffset) -> Self {
        Self {
            zone,
            frozen: RwLock::new(None),
        }
    }

    fn frozen(&self) -> Option<(DateTime<Utc>, FixedOffset)> {
        *rwlock_read_or_recover(&self.frozen)
    }
}

impl Clock for MockableClock {
    fn instant(&self) -> DateTime<Utc> {
        match self.frozen() {
            Some((instant, _)) => instant,
            None => Utc::now(),
        }
    }

    fn zone(&self) -> FixedOffset {
        match self.frozen() {
            Some((_, zone)) => zone,
            None => self.zone,
        }
    }
}

impl FreezableClock for MockableClock {
    fn freeze(&self, instant: DateTime<Utc>, zone: FixedOffset) {
        debug!(instant = %instant, zone = %zone, "Freezing clock");
        *rwlock_write_or_recover(&self.frozen) = Some((instant, zone));
    }

    fn unfreeze(&self) {
        if rwlock_write_or_recover(&self.frozen).take().is_some() {
            debug!("Clock unfrozen");
        }
    }

    fn is_frozen(&self) -> bool {
        self.frozen().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unfrozen_clock_follows_system_time() {
        let clock = MockableClock::new();
        let before = Utc::now();
        let read = clock.instant();
        assert!(read >= before);
        assert!(!clock.is_frozen());
        assert_eq!(clock.zone(), Utc.fix());
    }

    #[test]
    fn test_frozen_clock_returns_fixed_instant_until_unfrozen() {
        let clock = MockableClock::new();
        let instant = Utc.with_ymd_and_hms(2025, 1, 10, 12, 30, 15).unwrap();

        clock.freeze(instant, Utc.fix());

        assert_eq!(clock.instant(), instant);
        assert_eq!(clock.instant(), instant);
        assert_eq!(clock.now().to_rfc3339(), "2025-01-10T12:30:15+00:00");

        clock.unfreeze();
        assert!(!clock.is_frozen());
        assert!(clock.instant() > instant);
    }

    #[test]
    fn test_frozen_zone_overrides_default_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let clock = MockableClock::with_zone(plus_two);
        assert_eq!(clock.zone(), plus_two);

        clock.freeze(Utc.with_ymd_and_hms(2010, 6, 10, 17, 0, 0).unwrap(), Utc.fix());
        assert_eq!(clock.zone(), Utc.fix());
        assert_eq!(clock.now().to_rfc3339(), "2010-06-10T17:00:00+00:00");
    }
}
