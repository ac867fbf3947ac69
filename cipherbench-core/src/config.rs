// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML suite definition parser with strict schema validation.
//!
//! Validates the benchmark suite at start-up time.
//! Any invalid field results in a HardValidationError before any benchmark runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BenchError, BenchResult, HardValidationError};
use crate::types::{
    Algorithm, BenchmarkName, BenchmarkSpec, IterationCount, Operation, PayloadSize,
};

/// Size of the RSA session key wrapped by encrypt/decrypt benchmarks.
pub const DEFAULT_SESSION_KEY_BYTES: usize = 32;
/// Measured-iteration ceiling for RSA-2048 key generation in the default suite.
const RSA_KEYGEN_MAX_ITERATIONS: u64 = 10;
/// Warm-up ceiling for RSA-2048 key generation in the default suite.
const RSA_KEYGEN_MAX_WARMUP: u64 = 2;

/// Raw benchmark entry as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBenchmark {
    name: String,
    algorithm: Algorithm,
    operation: Operation,
    iterations: Option<u64>,
    warmup_iterations: Option<u64>,
    input_size_bytes: Option<usize>,
}

/// Raw suite-wide settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuiteSettings {
    #[serde(default = "default_suite_name")]
    name: String,
    #[serde(default)]
    payload_file: Option<String>,
    #[serde(default = "default_payload_size")]
    payload_size_bytes: usize,
    #[serde(default = "default_iterations")]
    iterations: u64,
    #[serde(default = "default_warmup_iterations")]
    warmup_iterations: u64,
}

fn default_suite_name() -> String {
    "OPGW AGC CRYPTOGRAPHY BENCHMARK".to_string()
}

fn default_payload_size() -> usize {
    1024
}

fn default_iterations() -> u64 {
    100
}

fn default_warmup_iterations() -> u64 {
    10
}

impl Default for RawSuiteSettings {
    fn default() -> Self {
        Self {
            name: default_suite_name(),
            payload_file: None,
            payload_size_bytes: default_payload_size(),
            iterations: default_iterations(),
            warmup_iterations: default_warmup_iterations(),
        }
    }
}

/// Raw root suite file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuite {
    #[serde(default)]
    suite: RawSuiteSettings,
    benchmarks: Vec<RawBenchmark>,
}

/// Validated suite-wide settings.
#[derive(Debug, Clone)]
pub struct SuiteSettings {
    pub name: String,
    pub payload_file: Option<PathBuf>,
    pub payload_size: PayloadSize,
    pub iterations: IterationCount,
    pub warmup_iterations: u64,
}

impl SuiteSettings {
    /// Validate settings supplied directly (e.g. from the command line).
    pub fn new(
        name: impl Into<String>,
        payload_file: Option<PathBuf>,
        payload_size_bytes: usize,
        iterations: u64,
        warmup_iterations: u64,
    ) -> BenchResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "suite.name",
                value: name,
                reason: "Suite name cannot be empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            name,
            payload_file,
            payload_size: PayloadSize::new(payload_size_bytes)?,
            iterations: IterationCount::new(iterations)?,
            warmup_iterations,
        })
    }
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            name: default_suite_name(),
            payload_file: None,
            payload_size: PayloadSize::new_unchecked(default_payload_size()),
            iterations: IterationCount::new_unchecked(default_iterations()),
            warmup_iterations: default_warmup_iterations(),
        }
    }
}

/// Complete validated suite.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub settings: SuiteSettings,
    pub benchmarks: Vec<BenchmarkSpec>,
}

impl SuiteConfig {
    /// The built-in suite: every supported operation of every algorithm,
    /// in a fixed order.
    pub fn default_suite(settings: SuiteSettings) -> BenchResult<Self> {
        let mut benchmarks = Vec::new();

        for algorithm in Algorithm::ALL {
            for &operation in algorithm.operations() {
                let name = BenchmarkName::new(format!("{}-{}", algorithm.id(), operation))?;

                let (iterations, warmup) =
                    if algorithm == Algorithm::Rsa2048 && operation == Operation::KeyGen {
                        (
                            settings.iterations.get().min(RSA_KEYGEN_MAX_ITERATIONS),
                            settings.warmup_iterations.min(RSA_KEYGEN_MAX_WARMUP),
                        )
                    } else {
                        (settings.iterations.get(), settings.warmup_iterations)
                    };

                let input_size = match (algorithm, operation) {
                    (Algorithm::Rsa2048, Operation::Encrypt | Operation::Decrypt) => {
                        PayloadSize::new(DEFAULT_SESSION_KEY_BYTES)?
                    }
                    (a, Operation::Encrypt | Operation::Decrypt) if a.is_aead() => {
                        settings.payload_size
                    }
                    _ => PayloadSize::new(0)?,
                };

                // AEAD messages take the size of whatever payload is loaded.
                benchmarks.push(
                    BenchmarkSpec::new(
                        name,
                        algorithm,
                        operation,
                        input_size,
                        IterationCount::new(iterations)?,
                        warmup,
                    )?
                    .following_payload(),
                );
            }
        }

        Ok(Self {
            settings,
            benchmarks,
        })
    }

    /// Keep only benchmarks for the given algorithms, preserving order.
    pub fn retain_algorithms(&mut self, algorithms: &[Algorithm]) {
        if algorithms.is_empty() {
            return;
        }
        self.benchmarks
            .retain(|spec| algorithms.contains(&spec.algorithm()));
    }
}

/// Suite loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a suite from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<SuiteConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading suite file",
            source: e,
        })?;

        let mut config = Self::load_string(&content)?;

        // Relative fixture paths are resolved against the suite file.
        if let (Some(file), Some(parent)) = (config.settings.payload_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = parent.join(&*file);
            }
        }

        Ok(config)
    }

    /// Load and validate a suite from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<SuiteConfig> {
        let raw: RawSuite = serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    /// Validate raw suite and convert to validated types.
    fn validate(raw: RawSuite) -> BenchResult<SuiteConfig> {
        let settings = Self::validate_settings(raw.suite)?;

        if raw.benchmarks.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: "At least one benchmark must be defined".to_string(),
            }
            .into());
        }

        let mut benchmarks = Vec::with_capacity(raw.benchmarks.len());
        let mut seen = HashSet::new();

        for (index, raw_bench) in raw.benchmarks.into_iter().enumerate() {
            let spec = Self::validate_benchmark(raw_bench, &settings, index)?;

            if !seen.insert(spec.name().clone()) {
                return Err(BenchError::DuplicateBenchmark {
                    name: spec.name().clone(),
                });
            }

            benchmarks.push(spec);
        }

        Ok(SuiteConfig {
            settings,
            benchmarks,
        })
    }

    fn validate_settings(raw: RawSuiteSettings) -> BenchResult<SuiteSettings> {
        SuiteSettings::new(
            raw.name,
            raw.payload_file.map(PathBuf::from),
            raw.payload_size_bytes,
            raw.iterations,
            raw.warmup_iterations,
        )
    }

    /// Validate a single benchmark entry, filling gaps from suite defaults.
    fn validate_benchmark(
        raw: RawBenchmark,
        settings: &SuiteSettings,
        index: usize,
    ) -> BenchResult<BenchmarkSpec> {
        let name = BenchmarkName::new(&raw.name).map_err(|e| match e {
            HardValidationError::InvalidFieldValue { value, reason, .. } => {
                HardValidationError::InvalidFieldValue {
                    field: "benchmarks[].name",
                    value,
                    reason: format!("{} (benchmark at index {})", reason, index),
                }
            }
            other => other,
        })?;

        let iterations = IterationCount::new(raw.iterations.unwrap_or(settings.iterations.get()))?;
        let warmup = raw.warmup_iterations.unwrap_or(settings.warmup_iterations);

        let input_size = match raw.input_size_bytes {
            Some(bytes) => PayloadSize::new(bytes)?,
            None => match (raw.algorithm, raw.operation) {
                (Algorithm::Rsa2048, Operation::Encrypt | Operation::Decrypt) => {
                    PayloadSize::new(DEFAULT_SESSION_KEY_BYTES)?
                }
                (a, Operation::Encrypt | Operation::Decrypt) if a.is_aead() => {
                    settings.payload_size
                }
                _ => PayloadSize::new(0)?,
            },
        };

        let spec = BenchmarkSpec::new(
            name,
            raw.algorithm,
            raw.operation,
            input_size,
            iterations,
            warmup,
        )?;

        // Without an explicit size the whole payload is used.
        Ok(match raw.input_size_bytes {
            Some(_) => spec,
            None => spec.following_payload(),
        })
    }
}
