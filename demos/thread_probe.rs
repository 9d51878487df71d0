// Copyright 2025 The primepool authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Probe for how many OS threads this process can keep alive at once.
//!
//! Spawning one thread per candidate fails well before realistic bounds; this
//! probe measures where, which is the whole argument for sizing the worker
//! pool from the hardware parallelism instead. The probe threads are parked,
//! counted, and joined again before the process exits.

use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Spawn parked threads until the OS refuses one")]
struct Cli {
    /// Stop probing after this many threads even if spawning still succeeds.
    #[arg(long, default_value_t = 10_000)]
    max_threads: usize,

    /// Stack size per probe thread, in kibibytes.
    #[arg(long, default_value_t = 64)]
    stack_kib: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let stop = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::new();
    loop {
        if handles.len() == cli.max_threads {
            println!("Reached the cap of {} threads without a failure.", handles.len());
            break;
        }
        let stop = stop.clone();
        let spawned = std::thread::Builder::new()
            .stack_size(cli.stack_kib * 1024)
            .spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    std::thread::park_timeout(Duration::from_millis(100));
                }
            });
        match spawned {
            Ok(handle) => {
                handles.push(handle);
                if handles.len() % 1_000 == 0 {
                    println!("Thread count: {}", handles.len());
                }
            }
            Err(error) => {
                println!("Spawn refused after {} threads: {error}", handles.len());
                break;
            }
        }
    }

    stop.store(true, Ordering::Release);
    let count = handles.len();
    for handle in handles {
        handle.join().unwrap();
    }
    println!("Joined all {count} probe threads.");
}
