//! Cache penalty benchmark
//!
//! Walks dense pointer chains with strides of 16B to 4KiB over working sets from 64KiB to 64MiB
//! and prints the nanoseconds per hop for each (stride, working set) pair.
use std::process::ExitCode;

use chase_bench::{SweepConfig, run_tool};

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::init();
    run_tool(&SweepConfig::CACHE)
}
