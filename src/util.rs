// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// An ergonomic wrapper around a [`Mutex`]-[`Condvar`] pair.
pub struct Status<T> {
    mutex: Mutex<T>,
    condvar: Condvar,
}

impl<T> Status<T> {
    /// Creates a new status initialized with the given value.
    pub fn new(t: T) -> Self {
        Self {
            mutex: Mutex::new(t),
            condvar: Condvar::new(),
        }
    }

    /// Sets the status to the given value and notifies all waiting threads.
    pub fn notify_all(&self, t: T) {
        *self.mutex.lock().unwrap() = t;
        self.condvar.notify_all();
    }

    /// Waits until the predicate is false on this status.
    ///
    /// This returns a [`MutexGuard`], allowing to further inspect or modify
    /// the status.
    pub fn wait_while(&self, predicate: impl FnMut(&mut T) -> bool) -> MutexGuard<T> {
        self.condvar
            .wait_while(self.mutex.lock().unwrap(), predicate)
            .unwrap()
    }

    /// Waits until the predicate is false on this status, or until the given
    /// duration has elapsed.
    ///
    /// Returns `true` if the wait stopped because the predicate turned false,
    /// and `false` if the timeout elapsed first.
    pub fn wait_timeout_while(
        &self,
        duration: Duration,
        predicate: impl FnMut(&mut T) -> bool,
    ) -> bool {
        let (_guard, result) = self
            .condvar
            .wait_timeout_while(self.mutex.lock().unwrap(), duration, predicate)
            .unwrap();
        !result.timed_out()
    }
}
