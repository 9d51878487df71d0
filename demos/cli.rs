// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI tool to enumerate primes with either engine.

use clap::{Parser, ValueEnum};
use primepool::{
    compute_primes, compute_primes_parallel_with, compute_primes_sieve, CpuPinningPolicy,
    PoolConfig, ThreadCount,
};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(about = "Enumerate the primes in [2, bound]")]
struct Cli {
    /// Upper bound of the searched range.
    bound: i64,

    /// Engine to run.
    #[arg(long, value_enum, default_value = "auto")]
    engine: EngineCli,

    /// Number of worker threads for the parallel engine. Defaults to the
    /// available parallelism.
    #[arg(long)]
    num_threads: Option<NonZeroUsize>,

    /// Pin worker threads to CPUs, where supported.
    #[arg(long)]
    pin_cpus: bool,

    /// Give up if the parallel engine takes longer than this many
    /// milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print every prime rather than just the count.
    #[arg(long)]
    print: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineCli {
    /// Sequential Sieve of Eratosthenes.
    Sieve,
    /// Parallel trial-division worker pool.
    Parallel,
    /// Sieve for small bounds, worker pool otherwise.
    Auto,
}

fn main() -> Result<(), primepool::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let mut primes = match cli.engine {
        EngineCli::Sieve => compute_primes_sieve(cli.bound)?,
        EngineCli::Parallel => {
            let config = PoolConfig {
                num_threads: match cli.num_threads {
                    Some(num_threads) => ThreadCount::Count(num_threads),
                    None => ThreadCount::AvailableParallelism,
                },
                cpu_pinning: if cli.pin_cpus {
                    CpuPinningPolicy::IfSupported
                } else {
                    CpuPinningPolicy::No
                },
                timeout: cli.timeout_ms.map(Duration::from_millis),
            };
            compute_primes_parallel_with(cli.bound, &config)?
                .into_iter()
                .collect()
        }
        EngineCli::Auto => compute_primes(cli.bound)?,
    };
    let elapsed = start.elapsed();

    primes.sort_unstable();
    if cli.print {
        for prime in &primes {
            println!("{prime}");
        }
    }
    println!(
        "{} primes in [2, {}] in {elapsed:?}",
        primes.len(),
        cli.bound
    );
    Ok(())
}
