// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Reduction of a sample series into summary statistics.
//!
//! Values are sorted before any floating-point accumulation so the same
//! series always produces bit-identical output.

use cipherbench_core::{BenchError, BenchResult, BenchmarkSpec};

use crate::harness::SampleSeries;
use crate::metrics::{AggregateResult, MemoryStats, TimingStats};

/// Nearest-rank percentile of an ascending, non-empty slice.
fn percentile(sorted: &[u64], pct: f64) -> u64 {
    let rank = (pct * sorted.len() as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Median of an ascending, non-empty slice; the two central values are
/// averaged for even lengths.
fn median(sorted: &[u64]) -> f64 {
    let len = sorted.len();
    if len % 2 == 1 {
        sorted[len / 2] as f64
    } else {
        (sorted[len / 2 - 1] as f64 + sorted[len / 2] as f64) / 2.0
    }
}

impl TimingStats {
    /// Summarise nanosecond values. `None` for an empty input.
    pub fn from_values(values: &[u64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let len = sorted.len();

        let min_ns = sorted[0];
        let max_ns = sorted[len - 1];
        let sum: u128 = sorted.iter().map(|&x| x as u128).sum();
        let mean_ns = (sum as f64 / len as f64).clamp(min_ns as f64, max_ns as f64);

        // Population standard deviation
        let variance: f64 = sorted
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean_ns;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;

        Some(Self {
            min_ns,
            max_ns,
            mean_ns,
            median_ns: median(&sorted),
            std_dev_ns: variance.sqrt(),
            p95_ns: percentile(&sorted, 95.0),
            p99_ns: percentile(&sorted, 99.0),
        })
    }
}

impl MemoryStats {
    /// Summarise resident-memory deltas. `None` for an empty input.
    pub fn from_deltas(deltas: &[i64], resident_bytes_after: u64) -> Option<Self> {
        let mut sorted = deltas.to_vec();
        sorted.sort_unstable();
        let (&min_delta_bytes, &max_delta_bytes) = (sorted.first()?, sorted.last()?);
        let sum: i128 = sorted.iter().map(|&d| d as i128).sum();

        Some(Self {
            min_delta_bytes,
            max_delta_bytes,
            mean_delta_bytes: (sum as f64 / sorted.len() as f64)
                .clamp(min_delta_bytes as f64, max_delta_bytes as f64),
            resident_bytes_after,
        })
    }
}

/// Reduce a series into an aggregate result for `spec`.
///
/// Fails with `EmptySeries` rather than dividing by zero.
pub fn aggregate(
    spec: &BenchmarkSpec,
    series: &SampleSeries,
    resident_bytes_after: u64,
) -> BenchResult<AggregateResult> {
    let empty = || BenchError::EmptySeries {
        name: spec.name().clone(),
    };

    let wall = TimingStats::from_values(&series.wall_times()).ok_or_else(empty)?;
    let cpu = TimingStats::from_values(&series.cpu_times()).ok_or_else(empty)?;
    let memory =
        MemoryStats::from_deltas(&series.memory_deltas(), resident_bytes_after).ok_or_else(empty)?;

    Ok(AggregateResult::measured(
        spec.clone(),
        wall,
        cpu,
        memory,
        series.len() as u64,
        series.failures(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::RawSample;
    use cipherbench_core::{Algorithm, BenchmarkName, IterationCount, Operation, PayloadSize};

    fn spec() -> BenchmarkSpec {
        BenchmarkSpec::new(
            BenchmarkName::new("x25519-exchange").unwrap(),
            Algorithm::X25519,
            Operation::Exchange,
            PayloadSize::new(0).unwrap(),
            IterationCount::new(10).unwrap(),
            2,
        )
        .unwrap()
    }

    fn sample(wall: u64, cpu: u64, mem: i64) -> RawSample {
        RawSample {
            wall_time_ns: wall,
            cpu_time_ns: cpu,
            resident_memory_delta_bytes: mem,
        }
    }

    #[test]
    fn test_timing_stats_from_values() {
        let values = vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];
        let stats = TimingStats::from_values(&values).unwrap();

        assert_eq!(stats.min_ns, 100);
        assert_eq!(stats.max_ns, 1000);
        assert!((stats.median_ns - 550.0).abs() < 1e-9);
        assert!((stats.mean_ns - 550.0).abs() < 1e-9);
        // Population std dev of 100..=1000 step 100
        assert!((stats.std_dev_ns - 287.228_132_326_901_4).abs() < 1e-6);
        assert_eq!(stats.p95_ns, 1000);
        assert_eq!(stats.p99_ns, 1000);
    }

    #[test]
    fn test_odd_length_median() {
        let stats = TimingStats::from_values(&[9, 1, 5]).unwrap();
        assert_eq!(stats.median_ns, 5.0);
        assert_eq!(stats.min_ns, 1);
        assert_eq!(stats.max_ns, 9);
    }

    #[test]
    fn test_single_value() {
        let stats = TimingStats::from_values(&[42]).unwrap();
        assert_eq!(stats.min_ns, 42);
        assert_eq!(stats.max_ns, 42);
        assert_eq!(stats.median_ns, 42.0);
        assert_eq!(stats.mean_ns, 42.0);
        assert_eq!(stats.std_dev_ns, 0.0);
        assert_eq!(stats.p99_ns, 42);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values: Vec<u64> = (1..=100).collect();
        let stats = TimingStats::from_values(&values).unwrap();
        assert_eq!(stats.p95_ns, 95);
        assert_eq!(stats.p99_ns, 99);
    }

    #[test]
    fn test_ordering_invariants() {
        let inputs: [&[u64]; 5] = [
            &[1, 1_000_000_000, 3],
            &[u64::MAX, u64::MAX - 1, u64::MAX],
            &[7, 7, 7, 7],
            &[0, 0, 1],
            &[5, 3, 8, 1, 9, 2, 2, 2],
        ];
        for values in inputs {
            let stats = TimingStats::from_values(values).unwrap();
            let (min, max) = (stats.min_ns as f64, stats.max_ns as f64);
            assert!(min <= stats.median_ns && stats.median_ns <= max, "{:?}", values);
            assert!(min <= stats.mean_ns && stats.mean_ns <= max, "{:?}", values);
            assert!(!stats.std_dev_ns.is_nan());
        }
    }

    #[test]
    fn test_empty_values() {
        assert!(TimingStats::from_values(&[]).is_none());
        assert!(MemoryStats::from_deltas(&[], 0).is_none());
    }

    #[test]
    fn test_memory_stats() {
        let stats = MemoryStats::from_deltas(&[4096, -4096, 0, 8192], 1 << 20).unwrap();
        assert_eq!(stats.min_delta_bytes, -4096);
        assert_eq!(stats.max_delta_bytes, 8192);
        assert!((stats.mean_delta_bytes - 2048.0).abs() < 1e-9);
        assert_eq!(stats.resident_bytes_after, 1 << 20);
    }

    #[test]
    fn test_aggregate_empty_series() {
        let series = SampleSeries::default();
        let result = aggregate(&spec(), &series, 0);
        assert!(matches!(result, Err(BenchError::EmptySeries { .. })));
    }

    #[test]
    fn test_aggregate_counts() {
        let series = SampleSeries::from_samples(
            vec![sample(100, 90, 0), sample(300, 250, 4096), sample(200, 180, 0)],
            2,
        );
        let result = aggregate(&spec(), &series, 65536).unwrap();

        assert_eq!(result.sample_count, 3);
        assert_eq!(result.failures, 2);
        assert!(result.is_ok());

        let wall = result.wall.unwrap();
        assert_eq!(wall.min_ns, 100);
        assert_eq!(wall.max_ns, 300);
        assert_eq!(wall.median_ns, 200.0);

        let cpu = result.cpu.unwrap();
        assert_eq!(cpu.min_ns, 90);
        assert_eq!(cpu.max_ns, 250);
    }

    #[test]
    fn test_aggregate_deterministic() {
        let series = SampleSeries::from_samples(
            (0..50)
                .map(|i| sample(1_000 + (i * 7919) % 113, 900 + i, (i as i64 - 25) * 64))
                .collect(),
            0,
        );
        let a = aggregate(&spec(), &series, 0).unwrap();
        let b = aggregate(&spec(), &series, 0).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
