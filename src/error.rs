// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors surfaced by the prime-enumeration operations.

use std::fmt;
use std::time::Duration;

/// Error returned by the prime-enumeration operations.
///
/// Task-level failures are not represented here: a panicking primality check
/// is absorbed inside the worker pool (the candidate is treated as composite)
/// and never reaches the caller.
#[derive(Debug)]
pub enum Error {
    /// The requested bound is negative. Raised synchronously, before any
    /// worker pool is created or sieve table allocated.
    InvalidBound {
        /// The rejected bound.
        bound: i64,
    },
    /// The platform refused to spawn a worker thread. Fatal for the current
    /// invocation; no partial results are returned.
    WorkerPoolExhaustion {
        /// The underlying spawn failure.
        source: std::io::Error,
    },
    /// The wait on the completion latch exceeded the configured timeout.
    ComputationTimeout {
        /// The timeout that expired.
        timeout: Duration,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBound { bound } => {
                write!(f, "invalid bound {bound}: the bound must be non-negative")
            }
            Error::WorkerPoolExhaustion { source } => {
                write!(f, "failed to spawn a worker thread: {source}")
            }
            Error::ComputationTimeout { timeout } => {
                write!(f, "computation did not complete within {timeout:?}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WorkerPoolExhaustion { source } => Some(source),
            Error::InvalidBound { .. } | Error::ComputationTimeout { .. } => None,
        }
    }
}
