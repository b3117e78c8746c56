//! # Sweep
//!
//! Drives one benchmark tool over its matrix of configuration points. Each point is strictly
//! build chain -> start timer -> walk -> read timer -> release chain, and yields one ns/step
//! figure. Points run one after another on the calling thread; buffers never overlap in time.
//!
//! All sweep parameters are compiled in as [`SweepConfig`] presets. A single timing sample is
//! taken per point, with no warm-up and no outlier rejection.
use std::ops::Range;

use log::{debug, info};

use crate::chain::{Chain, SlotLayout};
use crate::error::BenchError;
use crate::timer::BenchmarkTimer;
use crate::walker::walk;

/// Which chain layout a sweep builds, and how its two axes map onto it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Outer axis: stride in bytes. Inner axis: working-set size in bytes.
    Cache,
    /// Outer axis: slot count. Inner axis: slide in bytes.
    TlbBySlot,
    /// Outer axis: slide in bytes. Inner axis: slot count.
    TlbBySlide,
}

impl Tool {
    /// Chain layout for one (outer, inner) configuration point
    pub fn layout(&self, outer: usize, inner: usize) -> SlotLayout {
        match self {
            Tool::Cache => SlotLayout::Dense {
                range_bytes: inner,
                stride: outer,
            },
            Tool::TlbBySlot => SlotLayout::Padded {
                slots: outer,
                slide: inner,
            },
            Tool::TlbBySlide => SlotLayout::Padded {
                slots: inner,
                slide: outer,
            },
        }
    }

    /// Unit suffix printed after outer-axis values
    pub fn outer_unit(&self) -> &'static str {
        match self {
            Tool::Cache | Tool::TlbBySlide => "B",
            Tool::TlbBySlot => "",
        }
    }

    /// Unit suffix printed after inner-axis column labels
    pub fn inner_unit(&self) -> &'static str {
        match self {
            Tool::Cache | Tool::TlbBySlot => "B",
            Tool::TlbBySlide => "",
        }
    }
}

/// Compiled-in parameters of one benchmark tool
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub tool: Tool,
    /// First line of the report
    pub title: &'static str,
    /// Header text preceding the inner-axis column labels
    pub axis_header: &'static str,
    /// One table row per value
    pub outer: &'static [usize],
    /// Inner axis values are `1 << e` for each `e`, one column each
    pub exponents: Range<u32>,
    /// Hops walked per configuration point
    pub steps: u64,
}

impl SweepConfig {
    /// Cache penalty sweep: strides 16B..4KiB over working sets of 64KiB..64MiB
    pub const CACHE: SweepConfig = SweepConfig {
        tool: Tool::Cache,
        title: "Show Cache Penalty Benchmarks(ns):",
        axis_header: "Stride\t| Memory Range",
        outer: &[16, 64, 256, 1024, 4096],
        exponents: 16..27,
        steps: 1_000_000,
    };

    /// TLB penalty sweep over slot counts, sliding slots 4B..32KiB apart (plus the pad)
    pub const TLB_SLOTS: SweepConfig = SweepConfig {
        tool: Tool::TlbBySlot,
        title: "Show TLB Penalty Benchmarks(ns):",
        axis_header: "Slot\t| Slide\t",
        outer: &[512, 1024, 2048, 4096, 8192],
        exponents: 2..16,
        steps: 10_000_000,
    };

    /// TLB penalty sweep over fixed slides, with 16..65536 slots
    pub const TLB_SLIDES: SweepConfig = SweepConfig {
        tool: Tool::TlbBySlide,
        title: "Show TLB Penalty Benchmarks(ns):",
        axis_header: "Slide\t| Slot\t",
        outer: &[1024, 2048, 4096, 8192, 16384, 32768, 65536],
        exponents: 4..17,
        steps: 10_000_000,
    };

    /// Inner axis values, in column order
    pub fn inner(&self) -> impl Iterator<Item = usize> + '_ {
        self.exponents.clone().map(|e| 1usize << e)
    }

    /// Number of numeric columns per row
    pub fn columns(&self) -> usize {
        self.exponents.len()
    }

    /// Run every configuration point, handing each finished row to `on_row` before starting the
    /// next one. Any failure aborts the whole sweep.
    pub fn run<F>(&self, mut on_row: F) -> Result<Vec<SweepRow>, BenchError>
    where
        F: FnMut(&SweepRow) -> Result<(), BenchError>,
    {
        info!(
            "{:?} sweep starting: {} rows x {} columns, {} steps per point",
            self.tool,
            self.outer.len(),
            self.columns(),
            self.steps
        );

        let mut rows = Vec::with_capacity(self.outer.len());
        for &outer in self.outer {
            let mut ns_per_step = Vec::with_capacity(self.columns());
            for inner in self.inner() {
                let layout = self.tool.layout(outer, inner);
                let ns = measure(layout, self.steps)?;
                debug!("{}: {:.2} ns/step", layout, ns);
                ns_per_step.push(ns);
            }

            let row = SweepRow { outer, ns_per_step };
            on_row(&row)?;
            rows.push(row);
        }

        info!("{:?} sweep completed", self.tool);
        Ok(rows)
    }
}

/// Results for one outer-axis value, one ns/step figure per inner-axis column
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub outer: usize,
    pub ns_per_step: Vec<f64>,
}

/// Time `steps` hops over a freshly built chain and return nanoseconds per hop.
/// The chain is released before returning. Zero steps measures nothing and reports 0.
pub fn measure(layout: SlotLayout, steps: u64) -> Result<f64, BenchError> {
    let chain = Chain::build(layout)?;

    let timer = BenchmarkTimer::new();
    walk(&chain, steps);
    let elapsed = timer.elapsed();

    drop(chain);

    if steps == 0 {
        return Ok(0.0);
    }
    Ok(elapsed / steps as f64 * 1e9)
}
