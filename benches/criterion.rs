// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const NUM_THREADS: &[usize] = &[1, 2, 4, 8];
const BOUNDS: &[i64] = &[100, 500, 1_000, 10_000];

fn primes(c: &mut Criterion) {
    let mut group = c.benchmark_group("primes");
    for bound in BOUNDS {
        group.throughput(Throughput::Elements(*bound as u64));
        group.bench_with_input(BenchmarkId::new("sieve", bound), bound, serial::sieve);
        for &num_threads in NUM_THREADS {
            group.bench_with_input(
                BenchmarkId::new(format!("rayon@{num_threads}"), bound),
                bound,
                |bencher, bound| rayon::primes(bencher, num_threads, bound),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("primepool@{num_threads}"), bound),
                bound,
                |bencher, bound| pool::primes(bencher, num_threads, bound),
            );
        }
    }
    group.finish();
}

/// Baseline benchmark using the sequential sieve (without any multi-threading
/// involved).
mod serial {
    use criterion::{black_box, Bencher};
    use primepool::compute_primes_sieve;

    pub fn sieve(bencher: &mut Bencher, bound: &i64) {
        bencher.iter(|| compute_primes_sieve(black_box(*bound)).unwrap());
    }
}

/// Benchmarks using the primepool worker pool.
mod pool {
    use criterion::{black_box, Bencher};
    use primepool::{compute_primes_parallel_with, CpuPinningPolicy, PoolConfig, ThreadCount};

    pub fn primes(bencher: &mut Bencher, num_threads: usize, bound: &i64) {
        let config = PoolConfig {
            num_threads: ThreadCount::try_from(num_threads).unwrap(),
            cpu_pinning: CpuPinningPolicy::No,
            timeout: None,
        };
        bencher.iter(|| compute_primes_parallel_with(black_box(*bound), &config).unwrap());
    }
}

/// Benchmarks using Rayon over the same trial-division oracle.
mod rayon {
    use criterion::{black_box, Bencher};
    use primepool::is_prime;
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    pub fn primes(bencher: &mut Bencher, num_threads: usize, bound: &i64) {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .unwrap();
        thread_pool.install(|| {
            bencher.iter(|| {
                (2..=black_box(*bound as u64))
                    .into_par_iter()
                    .filter(|&candidate| is_prime(candidate))
                    .collect::<Vec<u64>>()
            })
        });
    }
}

criterion_group!(benches, primes);
criterion_main!(benches);
