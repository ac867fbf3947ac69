// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Warm-up and repetition control.
//!
//! Runs discarded warm-up calls, then the measured repetitions of one
//! benchmark, tolerating individual failures.

use cipherbench_core::{BenchError, BenchResult, BenchmarkSpec, OperationError, Primitive};
use serde::{Deserialize, Serialize};

use crate::sampler::{RawSample, Sampler};

/// Object-safe view of a [`Primitive`] as stored in the registry.
pub trait Measurable {
    /// Correctness precondition, checked once before warm-up.
    fn check_precondition(&mut self) -> Result<(), OperationError>;

    /// Prepare inputs outside the window, then measure one invocation.
    fn sample_once(&mut self, sampler: &mut Sampler) -> Result<RawSample, OperationError>;
}

impl<P: Primitive> Measurable for P {
    fn check_precondition(&mut self) -> Result<(), OperationError> {
        Primitive::verify(self)
    }

    fn sample_once(&mut self, sampler: &mut Sampler) -> Result<RawSample, OperationError> {
        let input = self.prepare()?;
        sampler.measure(input, |input| self.invoke(input))
    }
}

/// Samples from the measured repetitions of one benchmark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<RawSample>,
    attempted: u64,
    failures: u64,
    last_error: Option<String>,
}

impl SampleSeries {
    /// Build a series directly, e.g. from previously recorded samples.
    pub fn from_samples(samples: Vec<RawSample>, failures: u64) -> Self {
        Self {
            attempted: samples.len() as u64 + failures,
            samples,
            failures,
            last_error: None,
        }
    }

    fn push(&mut self, sample: RawSample) {
        self.attempted += 1;
        self.samples.push(sample);
    }

    fn record_failure(&mut self, error: &OperationError) {
        self.attempted += 1;
        self.failures += 1;
        self.last_error = Some(error.to_string());
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Measured repetitions attempted, successful or not.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn wall_times(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.wall_time_ns).collect()
    }

    pub fn cpu_times(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.cpu_time_ns).collect()
    }

    pub fn memory_deltas(&self) -> Vec<i64> {
        self.samples
            .iter()
            .map(|s| s.resident_memory_delta_bytes)
            .collect()
    }
}

/// A benchmark harness driving warm-up and measured repetitions.
pub struct BenchmarkHarness {
    sampler: Sampler,
}

impl BenchmarkHarness {
    /// Harness measuring this process through the operating system.
    pub fn new() -> Result<Self, OperationError> {
        Ok(Self::with_sampler(Sampler::new()?))
    }

    /// Harness using the given sampler.
    pub fn with_sampler(sampler: Sampler) -> Self {
        Self { sampler }
    }

    /// Run one benchmark and collect its sample series.
    ///
    /// Warm-up output is discarded. A failed measured repetition is counted
    /// and the remaining repetitions still run. Fails with
    /// `AllRepetitionsFailed` when no repetition succeeded.
    pub fn run(&mut self, spec: &BenchmarkSpec, op: &mut dyn Measurable) -> BenchResult<SampleSeries> {
        op.check_precondition()
            .map_err(|source| BenchError::PreconditionFailed {
                name: spec.name().clone(),
                source,
            })?;

        // Warmup phase
        for round in 0..spec.warmup_iterations() {
            if let Err(e) = op.sample_once(&mut self.sampler) {
                tracing::debug!(benchmark = %spec.name(), round, error = %e, "Warm-up repetition failed");
            }
        }

        // Measurement phase
        let mut series = SampleSeries {
            samples: Vec::with_capacity(spec.iterations() as usize),
            ..SampleSeries::default()
        };
        for round in 0..spec.iterations() {
            match op.sample_once(&mut self.sampler) {
                Ok(sample) => series.push(sample),
                Err(e) => {
                    tracing::debug!(benchmark = %spec.name(), round, error = %e, "Repetition failed");
                    series.record_failure(&e);
                }
            }
        }

        if series.is_empty() {
            return Err(BenchError::AllRepetitionsFailed {
                name: spec.name().clone(),
                attempted: series.attempted(),
                last_error: series.last_error.unwrap_or_default(),
            });
        }

        Ok(series)
    }

    /// Resident set size observed at the end of the most recent sample.
    pub fn resident_bytes(&self) -> u64 {
        self.sampler.last_resident_bytes()
    }
}
