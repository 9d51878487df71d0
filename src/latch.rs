// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A countdown latch tracking task completions.

use super::util::Status;
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A synchronization primitive that releases waiters once a pre-determined
/// number of signals have been received.
///
/// The latch is initialized with the number of dispatched tasks; each task
/// signals exactly once via [`count_down()`](Self::count_down) or by dropping
/// a [`LatchGuard`], and the dispatching thread blocks in
/// [`wait()`](Self::wait) until the count reaches zero.
pub struct CountdownLatch {
    /// Number of signals still expected. On its own cache line, as every task
    /// completion touches it.
    remaining: CachePadded<AtomicUsize>,
    /// Set to `true` by the task that brings the count to zero.
    released: Status<bool>,
}

impl CountdownLatch {
    /// Creates a latch expecting the given number of signals.
    ///
    /// With a count of zero the latch starts released and
    /// [`wait()`](Self::wait) returns immediately.
    pub fn new(count: usize) -> Self {
        Self {
            remaining: CachePadded::new(AtomicUsize::new(count)),
            released: Status::new(count == 0),
        }
    }

    /// Records one completion.
    ///
    /// The task that brings the count to zero wakes up all waiters.
    ///
    /// # Panics
    ///
    /// Panics if called more times than the initial count, as that would mean
    /// a task signaled completion twice.
    pub fn count_down(&self) {
        let previous = self.remaining.fetch_sub(1, Ordering::SeqCst);
        assert!(previous > 0, "countdown latch signaled below zero");
        if previous == 1 {
            self.released.notify_all(true);
        }
    }

    /// Returns a guard that signals this latch exactly once when dropped.
    ///
    /// Holding the guard across a task body guarantees the signal even if the
    /// task panics, which keeps a waiter from deadlocking on a failed task.
    pub fn guard(&self) -> LatchGuard<'_> {
        LatchGuard { latch: self }
    }

    /// Blocks until all expected signals have been received.
    pub fn wait(&self) {
        drop(self.released.wait_while(|released| !*released));
    }

    /// Blocks until all expected signals have been received, or until the
    /// given duration has elapsed.
    ///
    /// Returns `true` if the latch was released, `false` on timeout.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        self.released
            .wait_timeout_while(duration, |released| !*released)
    }
}

/// A guard that signals its [`CountdownLatch`] once on drop.
pub struct LatchGuard<'a> {
    latch: &'a CountdownLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
