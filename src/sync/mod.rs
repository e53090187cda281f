//! Polling, request sequencing and scope lifecycle shared by the sync clients

mod outcome;
mod poller;
mod scope;
mod sequence;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use outcome::*;
pub use poller::*;
pub use scope::*;
pub use sequence::*;

// A panic while holding a state lock leaves plain data behind, so the
// guard is recovered instead of propagating the poison.
pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
