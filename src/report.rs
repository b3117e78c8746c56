//! Fixed-format text table for sweep results.
//!
//! ```text
//! Show Cache Penalty Benchmarks(ns):
//! Stride\t| Memory Range\t2^16B\t2^17B ...
//! ========================
//! 16B\t|\t\t1.23\t1.25 ...
//! ```
use std::io::Write;

use crate::error::BenchError;
use crate::sweep::{SweepConfig, SweepRow};

const SEPARATOR: &str = "========================";

/// Title, axis header with one `2^<e>` label per column, and the separator line
pub fn write_header<W: Write>(w: &mut W, config: &SweepConfig) -> std::io::Result<()> {
    writeln!(w, "{}", config.title)?;
    write!(w, "{}", config.axis_header)?;
    for e in config.exponents.clone() {
        write!(w, "\t2^{}{}", e, config.tool.inner_unit())?;
    }
    writeln!(w)?;
    writeln!(w, "{}", SEPARATOR)
}

/// One data row: the outer value, then each ns/step figure to two decimals
pub fn write_row<W: Write>(w: &mut W, config: &SweepConfig, row: &SweepRow) -> std::io::Result<()> {
    write!(w, "{}{}\t|\t", row.outer, config.tool.outer_unit())?;
    for ns in &row.ns_per_step {
        write!(w, "\t{:4.2}", ns)?;
    }
    writeln!(w)
}

/// Print the header, run the sweep and print every row as soon as it completes
pub fn run_to<W: Write>(config: &SweepConfig, w: &mut W) -> Result<Vec<SweepRow>, BenchError> {
    write_header(w, config)?;
    w.flush()?;

    config.run(|row| {
        write_row(w, config, row)?;
        w.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cache_header_labels_bytes() {
        let text = render(|w| write_header(w, &SweepConfig::CACHE));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Show Cache Penalty Benchmarks(ns):");
        assert_eq!(
            lines[1],
            "Stride\t| Memory Range\t2^16B\t2^17B\t2^18B\t2^19B\t2^20B\t2^21B\t2^22B\t2^23B\t2^24B\t2^25B\t2^26B"
        );
        assert_eq!(lines[2], "========================");
    }

    #[test]
    fn tlb_headers_label_each_axis() {
        let slots = render(|w| write_header(w, &SweepConfig::TLB_SLOTS));
        let header = slots.lines().nth(1).unwrap();
        assert!(header.starts_with("Slot\t| Slide\t\t2^2B\t2^3B"));
        assert!(header.ends_with("\t2^15B"));
        assert_eq!(header.matches("\t2^").count(), 14);

        let slides = render(|w| write_header(w, &SweepConfig::TLB_SLIDES));
        let header = slides.lines().nth(1).unwrap();
        assert!(header.starts_with("Slide\t| Slot\t\t2^4\t2^5"));
        assert!(header.ends_with("\t2^16"));
        assert_eq!(header.matches("\t2^").count(), 13);
        assert_eq!(slides.lines().next(), Some("Show TLB Penalty Benchmarks(ns):"));
    }

    #[test]
    fn rows_use_outer_unit_and_two_decimals() {
        let row = SweepRow {
            outer: 64,
            ns_per_step: vec![1.0, 12.346, 123.456],
        };
        let text = render(|w| write_row(w, &SweepConfig::CACHE, &row));
        assert_eq!(text, "64B\t|\t\t1.00\t12.35\t123.46\n");

        let row = SweepRow {
            outer: 512,
            ns_per_step: vec![0.5],
        };
        let text = render(|w| write_row(w, &SweepConfig::TLB_SLOTS, &row));
        assert_eq!(text, "512\t|\t\t0.50\n");

        let text = render(|w| write_row(w, &SweepConfig::TLB_SLIDES, &row));
        assert_eq!(text, "512B\t|\t\t0.50\n");
    }

    #[test]
    fn run_to_prints_one_line_per_row() {
        let config = SweepConfig {
            outer: &[512, 1024],
            exponents: 2..5,
            steps: 1_000,
            ..SweepConfig::TLB_SLOTS
        };

        let mut out = Vec::new();
        let rows = run_to(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(lines.len(), 3 + 2);
        assert!(lines[3].starts_with("512\t|\t"));
        assert!(lines[4].starts_with("1024\t|\t"));
        for line in &lines[3..] {
            let cells: Vec<&str> = line.split('\t').skip(3).collect();
            assert_eq!(cells.len(), 3);
            for cell in cells {
                let ns: f64 = cell.trim().parse().unwrap();
                assert!(ns.is_finite() && ns >= 0.0);
            }
        }
    }
}
