// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![forbid(missing_docs, unsafe_code)]

mod error;
mod latch;
mod macros;
mod pool;
mod primality;
mod sieve;
mod util;

pub use error::Error;
pub use pool::{
    compute_primes, compute_primes_parallel, compute_primes_parallel_with, CpuPinningPolicy,
    PoolConfig, ThreadCount,
};
pub use primality::is_prime;
pub use sieve::compute_primes_sieve;

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;

    macro_rules! expand_tests {
        ( $num_threads:expr, ) => {};
        ( $num_threads:expr, $case:ident, $( $others:tt )* ) => {
            #[test]
            fn $case() {
                $crate::test::$case($num_threads);
            }

            expand_tests!($num_threads, $($others)*);
        };
    }

    macro_rules! parallelism_tests {
        ( $mod:ident, $num_threads:expr, $( $tests:tt )* ) => {
            mod $mod {
                use super::*;

                expand_tests!($num_threads, $($tests)*);
            }
        };
    }

    macro_rules! all_parallelism_tests {
        ( $mod:ident, $num_threads:expr ) => {
            parallelism_tests!(
                $mod,
                $num_threads,
                test_first_primes_set,
                test_matches_sieve_at_representative_bounds,
                test_random_bounds_match_sieve,
            );
        };
    }

    all_parallelism_tests!(threads_1, 1);
    all_parallelism_tests!(threads_2, 2);
    all_parallelism_tests!(threads_4, 4);
    all_parallelism_tests!(threads_8, 8);

    fn config(num_threads: usize) -> PoolConfig {
        PoolConfig {
            num_threads: ThreadCount::try_from(num_threads).unwrap(),
            cpu_pinning: CpuPinningPolicy::No,
            timeout: None,
        }
    }

    fn sieve_as_set(bound: i64) -> HashSet<u64> {
        compute_primes_sieve(bound).unwrap().into_iter().collect()
    }

    fn test_first_primes_set(num_threads: usize) {
        let primes = compute_primes_parallel_with(10, &config(num_threads)).unwrap();
        assert_eq!(primes, [2, 3, 5, 7].into_iter().collect());
    }

    fn test_matches_sieve_at_representative_bounds(num_threads: usize) {
        for bound in [0, 1, 2, 3, 10, 100, 500, 1_000] {
            let parallel = compute_primes_parallel_with(bound, &config(num_threads)).unwrap();
            assert_eq!(parallel, sieve_as_set(bound), "bound {bound}");
        }
    }

    fn test_random_bounds_match_sieve(num_threads: usize) {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        for _ in 0..10 {
            let bound = rng.random_range(0..2_000);
            let parallel = compute_primes_parallel_with(bound, &config(num_threads)).unwrap();
            assert_eq!(parallel, sieve_as_set(bound), "bound {bound}");
        }
    }
}
