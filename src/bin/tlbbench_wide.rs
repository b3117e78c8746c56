//! TLB penalty benchmark, slide rows
//!
//! For fixed slides of 1KiB to 64KiB, grows the chain from 16 to 65536 slots. The largest points
//! need about 4GiB of backing memory.
use std::process::ExitCode;

use chase_bench::{SweepConfig, run_tool};

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::init();
    run_tool(&SweepConfig::TLB_SLIDES)
}
