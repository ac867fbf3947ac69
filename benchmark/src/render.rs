// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Text and JSON rendering of a finished report.
//!
//! All functions here are pure: they only format, never measure.

use std::fmt::Write;

use crate::metrics::{AggregateResult, MemoryStats, Report, TimingStats};

/// Column headers, in output order. Times are nanoseconds, memory is bytes.
pub const TABLE_COLUMNS: [&str; 17] = [
    "BENCHMARK",
    "ALGORITHM",
    "OPERATION",
    "INPUT_B",
    "ITER",
    "SAMPLES",
    "WALL_MIN_NS",
    "WALL_MEAN_NS",
    "WALL_MEDIAN_NS",
    "WALL_MAX_NS",
    "WALL_STDDEV_NS",
    "WALL_P99_NS",
    "CPU_MEAN_NS",
    "MEM_DELTA_MEAN_B",
    "MEM_DELTA_MAX_B",
    "FAILURES",
    "STATUS",
];

const PLACEHOLDER: &str = "-";

fn row(result: &AggregateResult) -> Vec<String> {
    let spec = &result.spec;
    let mut cells = vec![
        spec.name().to_string(),
        spec.algorithm().to_string(),
        spec.operation().to_string(),
        spec.input_size().bytes().to_string(),
        spec.iterations().to_string(),
        result.sample_count.to_string(),
    ];

    match (&result.wall, &result.cpu, &result.memory) {
        (Some(wall), Some(cpu), Some(memory)) => cells.extend([
            wall.min_ns.to_string(),
            format!("{:.1}", wall.mean_ns),
            format!("{:.1}", wall.median_ns),
            wall.max_ns.to_string(),
            format!("{:.1}", wall.std_dev_ns),
            wall.p99_ns.to_string(),
            format!("{:.1}", cpu.mean_ns),
            format!("{:.1}", memory.mean_delta_bytes),
            memory.max_delta_bytes.to_string(),
        ]),
        _ => cells.extend(std::iter::repeat(PLACEHOLDER.to_string()).take(9)),
    }

    cells.push(result.failures.to_string());
    cells.push(result.status.to_string());
    cells
}

/// Fixed-column text table, one row per result in report order.
///
/// Failed benchmarks keep their row; their errors are listed below the table.
pub fn render_table(report: &Report) -> String {
    let rows: Vec<Vec<String>> = report.results.iter().map(row).collect();

    let mut widths: Vec<usize> = TABLE_COLUMNS.iter().map(|h| h.len()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", report.benchmark_suite);
    let _ = writeln!(
        out,
        "payload: {} bytes ({:.2} KB), crc32 {:08x}, source {}",
        report.payload.size_bytes,
        report.payload.size_kb,
        report.payload.crc32,
        report.payload.source
    );
    out.push('\n');

    let header: Vec<String> = TABLE_COLUMNS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    for cells in &rows {
        push_line(&mut out, cells, &widths);
    }

    let failed: Vec<&AggregateResult> = report.failed().collect();
    if !failed.is_empty() {
        out.push('\n');
        out.push_str("errors:\n");
        for result in failed {
            let _ = writeln!(
                out,
                "  {}: {}",
                result.spec.name(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            // Text columns left-aligned, numbers right-aligned.
            if i < 3 || i == cells.len() - 1 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Pretty-printed JSON document of the whole report.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Short human-readable summary with auto-scaled units.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("Summary\n");
    out.push_str("-------\n");

    for result in &report.results {
        match (&result.wall, &result.memory) {
            (Some(wall), Some(memory)) => {
                let _ = writeln!(
                    out,
                    "{}: median={}, p99={}, mem={}",
                    result.spec.name(),
                    TimingStats::format_latency(wall.median_ns),
                    TimingStats::format_latency(wall.p99_ns as f64),
                    MemoryStats::format_bytes(memory.mean_delta_bytes)
                );
            }
            _ => {
                let _ = writeln!(out, "{}: FAILED", result.spec.name());
            }
        }
    }

    let healthy = report.results.iter().filter(|r| r.is_ok()).count();
    let _ = writeln!(
        out,
        "{}/{} benchmarks healthy",
        healthy,
        report.results.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MemoryStats, ReportContext};
    use cipherbench_core::{
        Algorithm, BenchError, BenchmarkName, BenchmarkSpec, IterationCount, Operation, Payload,
        PayloadSize,
    };

    fn spec(name: &str) -> BenchmarkSpec {
        BenchmarkSpec::new(
            BenchmarkName::new(name).unwrap(),
            Algorithm::Aes256Gcm,
            Operation::Encrypt,
            PayloadSize::new(1024).unwrap(),
            IterationCount::new(10).unwrap(),
            2,
        )
        .unwrap()
    }

    fn timing(base: u64) -> TimingStats {
        TimingStats {
            min_ns: base,
            max_ns: base * 3,
            mean_ns: base as f64 * 2.0,
            median_ns: base as f64 * 2.0,
            std_dev_ns: 12.5,
            p95_ns: base * 3,
            p99_ns: base * 3,
        }
    }

    fn report() -> Report {
        let payload = Payload::zeroed(PayloadSize::new(1024).unwrap());
        let mut report = Report::new(ReportContext::new("TEST SUITE", &payload));
        report.add_result(AggregateResult::measured(
            spec("aes-256-gcm-encrypt"),
            timing(1_000),
            timing(900),
            MemoryStats {
                min_delta_bytes: 0,
                max_delta_bytes: 4096,
                mean_delta_bytes: 409.6,
                resident_bytes_after: 1 << 20,
            },
            10,
            0,
        ));
        report.add_result(AggregateResult::failed(
            spec("broken"),
            &BenchError::AllRepetitionsFailed {
                name: BenchmarkName::new("broken").unwrap(),
                attempted: 10,
                last_error: "invalid key material".to_string(),
            },
        ));
        report
    }

    #[test]
    fn test_table_header_order() {
        let table = render_table(&report());
        let header = table
            .lines()
            .find(|l| l.starts_with("BENCHMARK"))
            .unwrap();
        let columns: Vec<&str> = header.split_whitespace().collect();
        assert_eq!(columns, TABLE_COLUMNS.to_vec());
    }

    #[test]
    fn test_table_rows() {
        let table = render_table(&report());
        assert!(table.starts_with("TEST SUITE\n"));
        assert!(table.contains("payload: 1024 bytes (1.00 KB)"));

        let ok_row = table
            .lines()
            .find(|l| l.starts_with("aes-256-gcm-encrypt"))
            .unwrap();
        let cells: Vec<&str> = ok_row.split_whitespace().collect();
        assert_eq!(cells[0], "aes-256-gcm-encrypt");
        assert_eq!(cells[1], "AES-256-GCM");
        assert_eq!(cells[2], "encrypt");
        assert_eq!(cells[3], "1024");
        assert_eq!(cells[6], "1000");
        assert_eq!(cells[7], "2000.0");
        assert_eq!(cells[cells.len() - 1], "OK");
    }

    #[test]
    fn test_failed_row_kept() {
        let table = render_table(&report());
        let failed_row = table.lines().find(|l| l.starts_with("broken")).unwrap();
        assert!(failed_row.ends_with("FAILED"));
        let placeholders = failed_row.split_whitespace().filter(|c| *c == "-").count();
        assert_eq!(placeholders, 9);
        assert!(table.contains("errors:"));
        assert!(table.contains("invalid key material"));
    }

    #[test]
    fn test_render_is_pure() {
        let report = report();
        assert_eq!(render_table(&report), render_table(&report));
        assert_eq!(render_json(&report).unwrap(), render_json(&report).unwrap());
    }

    #[test]
    fn test_json_round_trip_fields() {
        let json = render_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["benchmark_suite"], "TEST SUITE");
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
        assert_eq!(value["results"][1]["status"], "failed");
        assert!(value["results"][1]["wall"].is_null());
    }

    #[test]
    fn test_summary() {
        let summary = render_summary(&report());
        assert!(summary.contains("aes-256-gcm-encrypt: median=2.00μs, p99=3.00μs"));
        assert!(summary.contains("broken: FAILED"));
        assert!(summary.contains("1/2 benchmarks healthy"));
    }
}
