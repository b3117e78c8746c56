//! # chase-bench
//!
//! Memory latency micro-benchmarks built on pointer chasing. A cyclic chain is threaded through
//! one contiguous buffer at a fixed slot pitch, then walked so every hop is a load whose address
//! depends on the previous load. Sweeping the working-set size (cache tool) or the slot spacing
//! and slot count (TLB tools) yields a latency-vs-size table in nanoseconds per hop.
pub mod chain;
pub mod error;
pub mod report;
pub mod sweep;
pub mod timer;
pub mod walker;

use std::process::ExitCode;

pub use chain::{CACHE_LINE_BYTES, Chain, SlotLayout};
pub use error::BenchError;
pub use sweep::{SweepConfig, SweepRow, Tool, measure};
pub use timer::BenchmarkTimer;
pub use walker::walk;

/// CPU core the benchmark thread is pinned to
pub const BENCH_CPU_CORE: usize = 0;

/// Convert number of bytes to formatted string for fixed-width integer string
pub fn format_size_fixed_int(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if bytes >= GB && bytes % GB == 0 {
        format!("{:>4} GiB", bytes / GB)
    } else if bytes >= MB && bytes % MB == 0 {
        format!("{:>4} MiB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{:>4} KiB", bytes / KB)
    } else {
        format!("{:>4} B", bytes)
    }
}

/// Pin the calling thread to `cpu_core` and raise it to maximum priority.
///
/// Both steps are best effort: failures are logged and the benchmark keeps running on whatever
/// core the OS scheduler picks.
pub fn prepare_bench_thread(cpu_core: usize) {
    let core_num = core_affinity::CoreId { id: cpu_core };
    if !core_affinity::set_for_current(core_num) {
        log::warn!(
            "Couldn't pin benchmark thread to CPU core {} (NOTE: this is expected on macOS)",
            cpu_core
        );
    }

    if thread_priority::set_current_thread_priority(thread_priority::ThreadPriority::Max).is_err() {
        log::warn!("Couldn't set benchmark thread to maximum thread priority");
    }
}

/// Entry point shared by the benchmark binaries: prepare the thread, run `config` and stream its
/// table to stdout. Any error aborts the run with a failure exit code.
pub fn run_tool(config: &SweepConfig) -> ExitCode {
    prepare_bench_thread(BENCH_CPU_CORE);

    let stdout = std::io::stdout();
    match report::run_to(config, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:?} benchmark aborted: {}", config.tool, e);
            ExitCode::FAILURE
        }
    }
}
