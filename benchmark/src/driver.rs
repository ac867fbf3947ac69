// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Executes every registered benchmark and assembles the report.

use cipherbench_core::{BenchError, BenchResult, BenchmarkSpec};

use crate::harness::{BenchmarkHarness, Measurable};
use crate::metrics::{AggregateResult, Report, ReportContext};
use crate::registry::BenchmarkRegistry;
use crate::stats;

/// Runs a registry to completion.
pub struct Driver {
    harness: BenchmarkHarness,
}

impl Driver {
    pub fn new(harness: BenchmarkHarness) -> Self {
        Self { harness }
    }

    /// Run every benchmark in registration order, one result each.
    ///
    /// A benchmark that produces no usable samples is recorded as a failed
    /// row; the remaining benchmarks still run.
    pub fn execute_all(&mut self, registry: &mut BenchmarkRegistry, context: ReportContext) -> Report {
        let mut report = Report::new(context);
        tracing::info!(
            suite = %report.benchmark_suite,
            run_id = %report.run_id,
            benchmarks = registry.len(),
            "Starting benchmark run"
        );

        for entry in registry.iter_mut() {
            let result = match self.execute_one(&entry.spec, entry.op.as_mut()) {
                Ok(result) => result,
                Err(e) if is_per_benchmark_failure(&e) => {
                    tracing::warn!(benchmark = %entry.spec.name(), error = %e, "Benchmark failed");
                    AggregateResult::failed(entry.spec.clone(), &e)
                }
                Err(e) => {
                    tracing::error!(benchmark = %entry.spec.name(), error = %e, "Unexpected benchmark error");
                    AggregateResult::failed(entry.spec.clone(), &e)
                }
            };
            report.add_result(result);
        }

        tracing::info!(
            healthy = report.is_healthy(),
            failed = report.failed().count(),
            "Benchmark run complete"
        );
        report
    }

    fn execute_one(
        &mut self,
        spec: &BenchmarkSpec,
        op: &mut dyn Measurable,
    ) -> BenchResult<AggregateResult> {
        tracing::info!(
            benchmark = %spec.name(),
            algorithm = %spec.algorithm(),
            operation = %spec.operation(),
            iterations = spec.iterations(),
            warmup = spec.warmup_iterations(),
            "Running benchmark"
        );

        let series = self.harness.run(spec, op)?;
        let result = stats::aggregate(spec, &series, self.harness.resident_bytes())?;

        tracing::info!(
            benchmark = %spec.name(),
            samples = result.sample_count,
            failures = result.failures,
            "Benchmark finished"
        );
        Ok(result)
    }
}

/// Errors expected from a single benchmark. Anything else reaching the
/// driver is still recorded, but logged as unexpected.
pub fn is_per_benchmark_failure(error: &BenchError) -> bool {
    matches!(
        error,
        BenchError::AllRepetitionsFailed { .. }
            | BenchError::PreconditionFailed { .. }
            | BenchError::EmptySeries { .. }
    )
}
