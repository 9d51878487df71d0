// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parallel trial-division engine over a bounded worker pool.

use super::error::Error;
use super::latch::CountdownLatch;
use super::macros::{log_debug, log_warn};
use super::primality::is_prime;
use super::sieve::compute_primes_sieve;
use super::util::Status;
use crossbeam_utils::CachePadded;
// Platforms that support `libc::sched_setaffinity()`.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
use nix::{
    sched::{sched_setaffinity, CpuSet},
    unistd::Pid,
};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Number of worker threads to spawn in a pool.
///
/// The pool size is always derived from this value, never from the number of
/// candidates: spawning one OS thread per candidate exhausts native thread
/// limits at large bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Spawn the number of threads returned by
    /// [`std::thread::available_parallelism()`].
    AvailableParallelism,
    /// Spawn the given number of threads.
    Count(NonZeroUsize),
}

impl ThreadCount {
    /// Resolves this configuration into an effective thread count.
    fn resolve(self) -> NonZeroUsize {
        match self {
            ThreadCount::AvailableParallelism => std::thread::available_parallelism()
                .expect("Getting the available parallelism failed"),
            ThreadCount::Count(count) => count,
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = <NonZeroUsize as TryFrom<usize>>::Error;

    fn try_from(thread_count: usize) -> Result<Self, Self::Error> {
        let count = NonZeroUsize::try_from(thread_count)?;
        Ok(ThreadCount::Count(count))
    }
}

/// Policy to pin worker threads to CPUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CpuPinningPolicy {
    /// Don't pin worker threads to CPUs.
    No,
    /// Pin each worker thread to a CPU, if CPU pinning is supported and
    /// implemented on this platform.
    IfSupported,
    /// Pin each worker thread to a CPU. If CPU pinning isn't supported on this
    /// platform (or not implemented), creating a worker pool will panic.
    Always,
}

/// Configuration of the parallel engine's worker pool.
///
/// The pool is created when an enumeration starts and torn down before it
/// returns; a configuration can be reused across invocations.
#[derive(Clone, Copy, Debug)]
pub struct PoolConfig {
    /// Number of worker threads to spawn.
    pub num_threads: ThreadCount,
    /// Policy to pin worker threads to CPUs.
    pub cpu_pinning: CpuPinningPolicy,
    /// Upper bound on the time spent waiting for all tasks to complete.
    /// [`None`] waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: ThreadCount::AvailableParallelism,
            cpu_pinning: CpuPinningPolicy::No,
            timeout: None,
        }
    }
}

/// Bounds at or below this threshold are served by the sequential sieve in
/// [`compute_primes()`], as parallel dispatch overhead dominates there.
const PARALLEL_THRESHOLD: i64 = 512;

/// Commands sent to the worker threads after they spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WorkerCommand {
    /// Spawning isn't finished yet, hold before pulling candidates.
    Hold,
    /// All workers spawned, start pulling candidates.
    Run,
    /// The pool failed to spawn completely, exit without doing any work.
    Exit,
}

/// A thread-safe append-only container for the primes found by the workers.
struct Collector {
    primes: Mutex<Vec<u64>>,
}

impl Collector {
    fn new() -> Self {
        Self {
            primes: Mutex::new(Vec::new()),
        }
    }

    /// Appends one prime. Atomic with respect to other appends.
    fn push(&self, prime: u64) {
        self.primes.lock().unwrap().push(prime);
    }

    /// Materializes the collected primes as a set.
    fn into_set(self) -> HashSet<u64> {
        self.primes.into_inner().unwrap().into_iter().collect()
    }
}

/// Returns the set of primes in `[2, bound]`, enumerated by a worker pool
/// with the default [`PoolConfig`].
///
/// The returned set is equal, as a set, to the output of
/// [`compute_primes_sieve()`] for the same bound; no ordering is guaranteed.
/// Fails with [`Error::InvalidBound`] if the bound is negative, before any
/// pool is created.
///
/// ```
/// # use primepool::compute_primes_parallel;
/// let primes = compute_primes_parallel(10).unwrap();
/// assert_eq!(primes, [2, 3, 5, 7].into_iter().collect());
/// ```
pub fn compute_primes_parallel(bound: i64) -> Result<HashSet<u64>, Error> {
    compute_primes_parallel_with(bound, &PoolConfig::default())
}

/// Returns the set of primes in `[2, bound]`, enumerated by a worker pool
/// with the given configuration.
///
/// One task per candidate in `[2, bound]` is dispatched to the pool; each
/// task runs the trial-division oracle and appends to a shared collector on
/// success. The invocation blocks until every task has signaled completion,
/// then joins the pool and returns. A panic inside a task is absorbed (the
/// candidate counts as composite) and never stalls the completion latch.
///
/// # Errors
///
/// - [`Error::InvalidBound`] if the bound is negative.
/// - [`Error::WorkerPoolExhaustion`] if the platform refuses to spawn a
///   worker thread; in that case no candidate is processed.
/// - [`Error::ComputationTimeout`] if a timeout is configured and expires.
pub fn compute_primes_parallel_with(
    bound: i64,
    config: &PoolConfig,
) -> Result<HashSet<u64>, Error> {
    if bound < 0 {
        return Err(Error::InvalidBound { bound });
    }
    if bound < 2 {
        return Ok(HashSet::new());
    }
    run_pool(bound as u64, config, is_prime)
}

/// Returns the primes in `[2, bound]` in ascending order, picking the
/// cheapest strategy for the bound: the sequential sieve below a small
/// threshold, the parallel engine above it.
///
/// Fails with [`Error::InvalidBound`] if the bound is negative.
pub fn compute_primes(bound: i64) -> Result<Vec<u64>, Error> {
    if bound <= PARALLEL_THRESHOLD {
        compute_primes_sieve(bound)
    } else {
        let mut primes = compute_primes_parallel(bound)?
            .into_iter()
            .collect::<Vec<u64>>();
        primes.sort_unstable();
        Ok(primes)
    }
}

/// Runs the worker pool over candidates `[2, bound]` with the given primality
/// predicate. Requires `bound >= 2`.
///
/// Generic over the predicate so that tests can inject failing ones; the
/// public entry points always pass [`is_prime`].
pub(crate) fn run_pool(
    bound: u64,
    config: &PoolConfig,
    predicate: impl Fn(u64) -> bool + Sync,
) -> Result<HashSet<u64>, Error> {
    debug_assert!(bound >= 2);
    let num_candidates = (bound - 1) as usize;
    let num_threads: usize = config.num_threads.resolve().into();
    let cpu_pinning = config.cpu_pinning;

    #[cfg(any(
        miri,
        not(any(
            target_os = "android",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "linux"
        ))
    ))]
    match cpu_pinning {
        CpuPinningPolicy::No => (),
        CpuPinningPolicy::IfSupported => {
            log_warn!("Pinning threads to CPUs is not implemented on this platform.")
        }
        CpuPinningPolicy::Always => {
            panic!("Pinning threads to CPUs is not implemented on this platform.")
        }
    }

    // One latch signal per candidate, one shared cursor acting as the task
    // queue. Workers spawn in the Hold state and only start pulling once the
    // whole pool came up.
    let latch = CountdownLatch::new(num_candidates);
    let next_candidate = CachePadded::new(AtomicU64::new(2));
    let shutdown = AtomicBool::new(false);
    let collector = Collector::new();
    let command = Status::new(WorkerCommand::Hold);

    std::thread::scope(|scope| {
        let latch = &latch;
        let next_candidate = &next_candidate;
        let shutdown = &shutdown;
        let collector = &collector;
        let command = &command;
        let predicate = &predicate;

        for id in 0..num_threads {
            let spawned = std::thread::Builder::new()
                .name(format!("prime-worker-{id}"))
                .spawn_scoped(scope, move || {
                    pin_worker_thread(id, cpu_pinning);
                    worker_loop(
                        id,
                        bound,
                        next_candidate,
                        shutdown,
                        latch,
                        collector,
                        command,
                        predicate,
                    )
                });
            if let Err(source) = spawned {
                // All-or-nothing: workers that did spawn are still holding
                // and exit without pulling a single candidate.
                command.notify_all(WorkerCommand::Exit);
                return Err(Error::WorkerPoolExhaustion { source });
            }
        }
        log_debug!("[pool] Spawned {num_threads} workers for {num_candidates} candidates");

        command.notify_all(WorkerCommand::Run);
        let completed = match config.timeout {
            None => {
                latch.wait();
                true
            }
            Some(timeout) => latch.wait_timeout(timeout),
        };
        if !completed {
            // Workers notice the flag between tasks; the scope still joins
            // them before this invocation returns.
            shutdown.store(true, Ordering::Release);
            let timeout = config.timeout.unwrap();
            log_warn!("[pool] Computation timed out after {timeout:?}");
            return Err(Error::ComputationTimeout { timeout });
        }
        log_debug!("[pool] All {num_candidates} tasks completed");
        Ok(())
    })?;

    Ok(collector.into_set())
}

/// Main function run by a worker thread: pull candidates from the shared
/// cursor until it moves past the bound, signaling the latch exactly once per
/// candidate.
#[allow(clippy::too_many_arguments)]
fn worker_loop(
    id: usize,
    bound: u64,
    next_candidate: &AtomicU64,
    shutdown: &AtomicBool,
    latch: &CountdownLatch,
    collector: &Collector,
    command: &Status<WorkerCommand>,
    predicate: &(impl Fn(u64) -> bool + Sync),
) {
    let command = *command.wait_while(|c| *c == WorkerCommand::Hold);
    if command == WorkerCommand::Exit {
        log_debug!("[worker {id}] Pool spawning failed, exiting without work");
        return;
    }

    loop {
        if shutdown.load(Ordering::Acquire) {
            log_debug!("[worker {id}] Shutdown requested, abandoning the queue");
            break;
        }
        let candidate = next_candidate.fetch_add(1, Ordering::Relaxed);
        if candidate > bound {
            break;
        }

        // Signals the latch on drop, so a panicking predicate still counts
        // the task as completed.
        let _signal = latch.guard();
        match std::panic::catch_unwind(AssertUnwindSafe(|| predicate(candidate))) {
            Ok(true) => collector.push(candidate),
            Ok(false) => (),
            Err(_) => {
                log_warn!(
                    "[worker {id}] Primality check for {candidate} panicked, \
                     treating it as composite"
                );
            }
        }
    }
    log_debug!("[worker {id}] Queue drained, exiting");
}

/// Applies the CPU pinning policy to the calling worker thread.
#[cfg_attr(
    any(
        miri,
        not(any(
            target_os = "android",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "linux"
        ))
    ),
    allow(unused_variables)
)]
fn pin_worker_thread(id: usize, cpu_pinning: CpuPinningPolicy) {
    #[cfg(all(
        not(miri),
        any(
            target_os = "android",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "linux"
        )
    ))]
    match cpu_pinning {
        CpuPinningPolicy::No => (),
        CpuPinningPolicy::IfSupported => {
            let mut cpu_set = CpuSet::new();
            if let Err(_e) = cpu_set.set(id) {
                log_warn!("Failed to set CPU affinity for thread #{id}: {_e}");
            } else if let Err(_e) = sched_setaffinity(Pid::from_raw(0), &cpu_set) {
                log_warn!("Failed to set CPU affinity for thread #{id}: {_e}");
            } else {
                log_debug!("Pinned thread #{id} to CPU #{id}");
            }
        }
        CpuPinningPolicy::Always => {
            let mut cpu_set = CpuSet::new();
            if let Err(e) = cpu_set.set(id) {
                panic!("Failed to set CPU affinity for thread #{id}: {e}");
            } else if let Err(e) = sched_setaffinity(Pid::from_raw(0), &cpu_set) {
                panic!("Failed to set CPU affinity for thread #{id}: {e}");
            } else {
                log_debug!("Pinned thread #{id} to CPU #{id}");
            }
        }
    }
}
