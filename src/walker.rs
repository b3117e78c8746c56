use std::hint::black_box;

use crate::chain::Chain;

/// Follow `steps` links starting at the chain entry and return the offset the walk ends on.
///
/// The loop body is a single load whose address comes from the previous load, so the time spent
/// here is `steps` back-to-back memory latencies. Never inlined, and every input and the result go
/// through [`black_box`] so the optimizer can neither drop the walk nor fold it to a closed form.
#[inline(never)]
pub fn walk(chain: &Chain, steps: u64) -> usize {
    let base = black_box(chain.base_ptr());
    let steps = black_box(steps);
    let mut offset = black_box(chain.entry());

    for _ in 0..steps {
        // SAFETY: every link written by `Chain::build` is the offset of a slot that holds a full
        // link inside the buffer, and `chain` keeps the buffer alive for the whole walk. Slots may
        // be unaligned (e.g. a 68 byte pitch) hence the unaligned read.
        offset = unsafe { base.add(offset).cast::<usize>().read_unaligned() };
    }

    black_box(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{CACHE_LINE_BYTES, SlotLayout};
    use crate::timer::BenchmarkTimer;

    fn dense(range_bytes: usize, stride: usize) -> Chain {
        Chain::build(SlotLayout::Dense {
            range_bytes,
            stride,
        })
        .unwrap()
    }

    #[test]
    fn zero_steps_stays_on_entry() {
        let chain = dense(1 << 12, 64);
        assert_eq!(walk(&chain, 0), chain.entry());
    }

    #[test]
    fn walk_ends_on_steps_mod_len() {
        let chain = dense(1 << 16, 64);
        let len = chain.len() as u64;

        for steps in [1, 7, len - 1, len, len + 3, 1_000_000] {
            let expected = (steps % len) as usize * chain.pitch();
            assert_eq!(walk(&chain, steps), expected, "steps={}", steps);
        }
    }

    #[test]
    fn walk_handles_unaligned_padded_slots() {
        let chain = Chain::build(SlotLayout::Padded { slots: 5, slide: 4 }).unwrap();
        assert_eq!(walk(&chain, 3), 3 * (4 + CACHE_LINE_BYTES));
        assert_eq!(walk(&chain, 5), 0);
    }

    #[test]
    fn single_slot_chain_loops_on_itself() {
        let chain = dense(16, 16);
        assert_eq!(walk(&chain, 10_000), 0);
    }

    // Wall-clock timing: a loaded host can skew one side by more than the 3x band below
    #[test]
    #[ignore = "timing sensitive, run with --ignored on a quiet machine"]
    fn ns_per_step_is_stable_across_step_counts() {
        let chain = dense(1 << 16, 64);
        let n = 2_000_000u64;

        let per_step = |steps: u64| {
            // best of a few runs keeps scheduler hiccups out of the comparison
            (0..5)
                .map(|_| {
                    let timer = BenchmarkTimer::new();
                    walk(&chain, steps);
                    timer.elapsed() / steps as f64 * 1e9
                })
                .fold(f64::INFINITY, f64::min)
        };

        let single = per_step(n);
        let double = per_step(2 * n);
        assert!(single.is_finite() && double.is_finite());
        assert!(single > 0.0 && double > 0.0);

        let ratio = single / double;
        assert!(
            (0.33..3.0).contains(&ratio),
            "ns/step drifted between N and 2N: {:.3} vs {:.3}",
            single,
            double
        );
    }
}
