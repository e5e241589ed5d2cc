//! Poison-tolerant lock access for fixture state shared across tests.
//!
//! A test that panics while holding a suite or clock lock must not fail every
//! later test in the binary, so poisoned guards are logged and recovered.

use std::sync::LockResult;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use tracing::warn;

fn recover<G>(result: LockResult<G>, lock_kind: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            lock_kind,
            "Fixture lock poisoned by a panicking test; reusing its state"
        );
        poisoned.into_inner()
    })
}

pub fn rwlock_read_or_recover<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    recover(lock.read(), "rwlock-read")
}

pub fn rwlock_write_or_recover<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    recover(lock.write(), "rwlock-write")
}

pub fn mutex_lock_or_recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    recover(lock.lock(), "mutex")
}
