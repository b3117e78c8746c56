//! TLB penalty benchmark, slot-count rows
//!
//! For 512 to 8192 slots, slides consecutive slots 4B to 32KiB apart (plus one cache line of
//! padding so no two slots share a line) and prints the nanoseconds per hop.
use std::process::ExitCode;

use chase_bench::{SweepConfig, run_tool};

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::init();
    run_tool(&SweepConfig::TLB_SLOTS)
}
