// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Standardized result types for benchmark runs.
//!
//! This module defines the data structures used to capture and serialize
//! aggregated measurements and the report that carries them.

use chrono::{DateTime, Utc};
use cipherbench_core::{BenchError, BenchmarkSpec, Payload};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use uuid::Uuid;

/// Timing summary with statistical analysis, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Minimum observed time in nanoseconds
    pub min_ns: u64,
    /// Maximum observed time in nanoseconds
    pub max_ns: u64,
    /// Arithmetic mean in nanoseconds
    pub mean_ns: f64,
    /// Median in nanoseconds (mean of the two central values for even counts)
    pub median_ns: f64,
    /// Population standard deviation in nanoseconds
    pub std_dev_ns: f64,
    /// 95th percentile (nearest rank) in nanoseconds
    pub p95_ns: u64,
    /// 99th percentile (nearest rank) in nanoseconds
    pub p99_ns: u64,
}

impl TimingStats {
    /// Format a duration in human-readable form (auto-selects ns/μs/ms/s).
    pub fn format_latency(ns: f64) -> String {
        if ns < 1_000.0 {
            format!("{:.0}ns", ns)
        } else if ns < 1_000_000.0 {
            format!("{:.2}μs", ns / 1_000.0)
        } else if ns < 1_000_000_000.0 {
            format!("{:.2}ms", ns / 1_000_000.0)
        } else {
            format!("{:.2}s", ns / 1_000_000_000.0)
        }
    }
}

/// Resident-memory summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Smallest per-call change in resident set size, bytes
    pub min_delta_bytes: i64,
    /// Largest per-call change in resident set size, bytes
    pub max_delta_bytes: i64,
    /// Mean per-call change in resident set size, bytes
    pub mean_delta_bytes: f64,
    /// Resident set size after the last measured call, bytes
    pub resident_bytes_after: u64,
}

impl MemoryStats {
    /// Format a byte count in human-readable form.
    pub fn format_bytes(bytes: f64) -> String {
        let magnitude = bytes.abs();
        if magnitude < 1024.0 {
            format!("{:.0} B", bytes)
        } else if magnitude < 1024.0 * 1024.0 {
            format!("{:.2} KiB", bytes / 1024.0)
        } else {
            format!("{:.2} MiB", bytes / (1024.0 * 1024.0))
        }
    }
}

/// Outcome of one benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Ok,
    Failed,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Ok => write!(f, "OK"),
            ResultStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Aggregated result for one registered benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    /// The benchmark that produced this result
    pub spec: BenchmarkSpec,
    /// Whether the benchmark produced usable samples
    pub status: ResultStatus,
    /// Wall-clock statistics (absent when failed)
    pub wall: Option<TimingStats>,
    /// Process CPU-time statistics (absent when failed)
    pub cpu: Option<TimingStats>,
    /// Resident-memory statistics (absent when failed)
    pub memory: Option<MemoryStats>,
    /// Number of successful measured repetitions
    pub sample_count: u64,
    /// Number of failed measured repetitions
    pub failures: u64,
    /// Why the benchmark failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AggregateResult {
    /// A benchmark that produced at least one sample.
    pub fn measured(
        spec: BenchmarkSpec,
        wall: TimingStats,
        cpu: TimingStats,
        memory: MemoryStats,
        sample_count: u64,
        failures: u64,
    ) -> Self {
        Self {
            spec,
            status: ResultStatus::Ok,
            wall: Some(wall),
            cpu: Some(cpu),
            memory: Some(memory),
            sample_count,
            failures,
            error: None,
        }
    }

    /// A benchmark that produced nothing usable. Kept in the report so the
    /// row never silently disappears.
    pub fn failed(spec: BenchmarkSpec, error: &BenchError) -> Self {
        let failures = match error {
            BenchError::AllRepetitionsFailed { attempted, .. } => *attempted,
            _ => 0,
        };
        Self {
            spec,
            status: ResultStatus::Failed,
            wall: None,
            cpu: None,
            memory: None,
            sample_count: 0,
            failures,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Identity of the payload the symmetric benchmarks consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadInfo {
    pub size_bytes: usize,
    pub size_kb: f64,
    /// CRC-32 of the payload bytes
    pub crc32: u32,
    pub source: String,
}

impl From<&Payload> for PayloadInfo {
    fn from(payload: &Payload) -> Self {
        Self {
            size_bytes: payload.len(),
            size_kb: payload.size().kilobytes(),
            crc32: payload.checksum(),
            source: payload.source().to_string(),
        }
    }
}

/// Run-level context attached to a report.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub suite: String,
    pub payload: PayloadInfo,
    pub system_info: SystemInfo,
}

impl ReportContext {
    pub fn new(suite: impl Into<String>, payload: &Payload) -> Self {
        Self {
            suite: suite.into(),
            payload: PayloadInfo::from(payload),
            system_info: SystemInfo::collect(),
        }
    }
}

/// Complete benchmark run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// Timestamp when the run started
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Payload identity
    pub payload: PayloadInfo,
    /// One result per registered benchmark, in registration order
    pub results: Vec<AggregateResult>,
}

impl Report {
    /// Create an empty report for a run.
    pub fn new(context: ReportContext) -> Self {
        Self {
            benchmark_suite: context.suite,
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            system_info: context.system_info,
            payload: context.payload,
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: AggregateResult) {
        self.results.push(result);
    }

    /// Results that failed.
    pub fn failed(&self) -> impl Iterator<Item = &AggregateResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    /// True when every benchmark produced a non-failed result.
    pub fn is_healthy(&self) -> bool {
        self.results.iter().all(AggregateResult::is_ok)
    }

    /// Process exit status: 0 when healthy, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_healthy() {
            0
        } else {
            1
        }
    }
}
