// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Trial-division primality oracle.

/// Returns whether the given candidate is prime.
///
/// Values below 2 are not prime, 2 is prime, and even values above 2 are not
/// prime. Odd candidates are tested by trial division against every odd
/// divisor from 3 up to `candidate - 1`. The scan deliberately doesn't stop
/// at `sqrt(candidate)`: the per-candidate cost is the workload that the
/// parallel engine distributes, and capping it would skew the benchmarks this
/// crate exists for. A found divisor still short-circuits the scan.
///
/// This function is pure and touches no shared state; any number of threads
/// can call it concurrently.
///
/// ```
/// # use primepool::is_prime;
/// assert!(is_prime(2));
/// assert!(is_prime(17));
/// assert!(!is_prime(1));
/// assert!(!is_prime(57));
/// ```
pub fn is_prime(candidate: u64) -> bool {
    if candidate < 2 {
        return false;
    }
    if candidate % 2 == 0 {
        return candidate == 2;
    }
    let mut divisor = 3;
    while divisor < candidate {
        if candidate % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}
