//! Clock port.

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Utc;

pub trait Clock: Send + Sync {
    fn instant(&self) -> DateTime<Utc>;

    fn zone(&self) -> FixedOffset;

    fn now(&self) -> DateTime<FixedOffset> {
        self.instant().with_timezone(&self.zone())
    }
}

/// A clock the lifecycle binder can pin to a fixed instant for one test.
pub trait FreezableClock: Clock {
    fn freeze(&self, instant: DateTime<Utc>, zone: FixedOffset);

    fn unfreeze(&self);

    fn is_frozen(&self) -> bool;
}
