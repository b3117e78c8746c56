use thiserror::Error;

use crate::chain::SlotLayout;
use crate::format_size_fixed_int;

/// Errors surfaced by chain construction and table reporting
#[derive(Debug, Error)]
pub enum BenchError {
    /// Layout parameters that cannot describe a closed chain
    #[error("invalid chain layout ({layout}): {reason}")]
    InvalidLayout {
        layout: SlotLayout,
        reason: &'static str,
    },

    /// The allocator refused the backing buffer for a configuration point.
    /// Partial sweeps are not meaningful, so callers abort the run.
    #[error("allocation failed for configuration ({layout}) of {}", size_label(.bytes))]
    Allocation { layout: SlotLayout, bytes: usize },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

fn size_label(bytes: &usize) -> String {
    format_size_fixed_int(*bytes as u64).trim_start().to_string()
}
