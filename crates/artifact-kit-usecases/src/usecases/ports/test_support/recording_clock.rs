use std::sync::RwLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Offset;
use chrono::Utc;

use crate::common::rwlock_read_or_recover;
use crate::common::rwlock_write_or_recover;
use crate::usecases::ports::Clock;
use crate::usecases::ports::FreezableClock;

/// Clock that reads the Unix epoch until frozen.
#[derive(Default)]
pub struct RecordingClock {
    frozen: RwLock<Option<(DateTime<Utc>, FixedOffset)>>,
    freezes: AtomicUsize,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn freeze_count(&self) -> usize {
        self.freezes.load(Ordering::SeqCst)
    }
}

impl Clock for RecordingClock {
    fn instant(&self) -> DateTime<Utc> {
        let frozen = *rwlock_read_or_recover(&self.frozen);
        frozen.map(|(instant, _)| instant).unwrap_or_default()
    }

    fn zone(&self) -> FixedOffset {
        let frozen = *rwlock_read_or_recover(&self.frozen);
        frozen.map(|(_, zone)| zone).unwrap_or_else(|| Utc.fix())
    }
}

impl FreezableClock for RecordingClock {
    fn freeze(&self, instant: DateTime<Utc>, zone: FixedOffset) {
        self.freezes.fetch_add(1, Ordering::SeqCst);
        *rwlock_write_or_recover(&self.frozen) = Some((instant, zone));
    }

    fn unfreeze(&self) {
        *rwlock_write_or_recover(&self.frozen) = None;
    }

    fn is_frozen(&self) -> bool {
        rwlock_read_or_recover(&self.frozen).is_some()
    }
}
