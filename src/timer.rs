use std::time::Instant;

/// Wall-clock stopwatch bracketing one walk
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkTimer {
    base: Instant,
}

impl BenchmarkTimer {
    /// Start timing now
    pub fn new() -> Self {
        BenchmarkTimer {
            base: Instant::now(),
        }
    }

    /// Seconds since construction or the last [`reset`](Self::reset)
    pub fn elapsed(&self) -> f64 {
        self.base.elapsed().as_secs_f64()
    }

    pub fn reset(&mut self) {
        self.base = Instant::now();
    }
}

impl Default for BenchmarkTimer {
    fn default() -> Self {
        Self::new()
    }
}
