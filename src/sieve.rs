// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequential Sieve of Eratosthenes baseline.

use super::error::Error;

/// Returns the primes in `[2, bound]` in strictly ascending order, using a
/// single-threaded Sieve of Eratosthenes.
///
/// This is the deterministic reference that the parallel engine is checked
/// against, and the fast path for small bounds where parallel dispatch
/// overhead isn't justified. O(bound log log bound) time, O(bound) space; the
/// sieve table is exclusively owned by the call and freed before it returns.
///
/// Fails with [`Error::InvalidBound`] if the bound is negative, before
/// allocating anything.
///
/// ```
/// # use primepool::compute_primes_sieve;
/// assert_eq!(compute_primes_sieve(10).unwrap(), vec![2, 3, 5, 7]);
/// ```
pub fn compute_primes_sieve(bound: i64) -> Result<Vec<u64>, Error> {
    if bound < 0 {
        return Err(Error::InvalidBound { bound });
    }
    let bound = bound as usize;
    if bound < 2 {
        return Ok(Vec::new());
    }

    // Entry `n` is true while `n` is still possibly prime.
    let mut table = vec![true; bound + 1];
    let mut primes = Vec::new();
    for number in 2..=bound {
        if !table[number] {
            continue;
        }
        primes.push(number as u64);
        // Strike every strict multiple, starting at 2n.
        for multiple in (number * 2..=bound).step_by(number) {
            table[multiple] = false;
        }
    }
    Ok(primes)
}
