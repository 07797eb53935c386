//! # Guard Module
//!
//! This module wraps a [`Channel`] in a mutual-exclusion discipline: at most
//! one logical operation holds the channel at a time, across OS threads, and
//! the channel is always left closed when nobody holds it.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use log::debug;

use crate::error::Result;
use crate::serial::port::{Channel, PortSettings, SerialDevice};

/// Mutex-guarded channel.
///
/// [`acquire`] blocks until the exclusive lock is obtainable, opens the
/// channel lazily, and hands back a [`ChannelGuard`]. Dropping the guard
/// closes the channel unconditionally and releases the lock, on every exit
/// path including panics.
///
/// The region is not reentrant: a thread calling [`acquire`] while already
/// holding a guard deadlocks. That is a contract violation by the caller,
/// not a recoverable error.
///
/// [`acquire`]: MutexSerial::acquire
pub struct MutexSerial<C: Channel> {
    channel: Mutex<C>,
}

impl MutexSerial<SerialDevice> {
    /// guard a serial device built from `settings`
    pub fn from_settings(settings: PortSettings) -> Self {
        Self::new(SerialDevice::new(settings))
    }
}

impl<C: Channel> MutexSerial<C> {
    /// guard an already-constructed channel
    pub fn new(channel: C) -> Self {
        MutexSerial {
            channel: Mutex::new(channel),
        }
    }

    /// Block until exclusive access is available, opening the channel if it
    /// is not already open.
    ///
    /// There is no timeout; a holder that never releases starves the rest.
    /// If the open attempt fails the error is returned with the lock already
    /// released, so a subsequent caller is not deadlocked.
    pub fn acquire(&self) -> Result<ChannelGuard<'_, C>> {
        let channel = self
            .channel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Self::into_guard(channel)
    }

    /// Non-blocking variant of [`acquire`]: returns `Ok(None)` when another
    /// holder currently has the channel.
    ///
    /// [`acquire`]: MutexSerial::acquire
    pub fn try_acquire(&self) -> Result<Option<ChannelGuard<'_, C>>> {
        match self.channel.try_lock() {
            Ok(channel) => Self::into_guard(channel).map(Some),
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Poisoned(poisoned)) => {
                Self::into_guard(poisoned.into_inner()).map(Some)
            }
        }
    }

    fn into_guard(mut channel: MutexGuard<'_, C>) -> Result<ChannelGuard<'_, C>> {
        if !channel.is_open() {
            // An early return here drops the MutexGuard, releasing the lock.
            channel.open()?;
        }
        debug!("channel acquired");
        Ok(ChannelGuard { channel })
    }
}

/// Scoped holder of the exclusive channel.
///
/// Dereferences to the underlying [`Channel`] for I/O. Dropping it closes
/// the channel, then releases the lock.
pub struct ChannelGuard<'a, C: Channel> {
    channel: MutexGuard<'a, C>,
}

impl<C: Channel> Deref for ChannelGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.channel
    }
}

impl<C: Channel> DerefMut for ChannelGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

impl<C: Channel> Drop for ChannelGuard<'_, C> {
    fn drop(&mut self) {
        // Close is unconditional, even when the channel was already open
        // before acquisition. No-op safe on a closed channel.
        self.channel.close();
        debug!("channel released");
    }
}
