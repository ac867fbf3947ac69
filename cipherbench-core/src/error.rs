//! Custom error types for cipherbench.
//!
//! Explicit enum error types throughout the library crates.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Algorithm, BenchmarkName, Operation};

/// Top-level error type for a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast Before Any Benchmark Runs
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Suite file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Suite parse error: {message}")]
    ConfigParse { message: String },

    #[error("Duplicate benchmark name: {name}")]
    DuplicateBenchmark { name: BenchmarkName },

    // =========================================================================
    // Per-Benchmark Errors - Recorded as Failed Rows, Never Fatal
    // =========================================================================
    #[error("Operation failed: {0}")]
    Operation(#[from] OperationError),

    #[error("All {attempted} repetitions of {name} failed; last error: {last_error}")]
    AllRepetitionsFailed {
        name: BenchmarkName,
        attempted: u64,
        last_error: String,
    },

    #[error("Correctness precondition failed for {name}: {source}")]
    PreconditionFailed {
        name: BenchmarkName,
        #[source]
        source: OperationError,
    },

    #[error("Cannot aggregate an empty sample series for {name}")]
    EmptySeries { name: BenchmarkName },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors abort startup.
/// Used when the suite definition is invalid and no measurement can be trusted.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{algorithm} does not support the {operation} operation")]
    UnsupportedOperation {
        algorithm: Algorithm,
        operation: Operation,
    },

    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },
}

/// Failures reported by the external cryptography libraries.
#[derive(Debug, Clone, Error)]
pub enum CryptoError {
    #[error("{algorithm} key generation failed: {reason}")]
    KeyGeneration { algorithm: Algorithm, reason: String },

    #[error("Invalid {algorithm} key material: {reason}")]
    InvalidKey { algorithm: Algorithm, reason: String },

    #[error("{algorithm} encryption failed: {reason}")]
    Encrypt { algorithm: Algorithm, reason: String },

    #[error("{algorithm} decryption failed: {reason}")]
    Decrypt { algorithm: Algorithm, reason: String },

    #[error("{algorithm} key agreement failed")]
    Agreement { algorithm: Algorithm },

    #[error("{algorithm} round trip did not reproduce the payload: {reason}")]
    Verification { algorithm: Algorithm, reason: String },
}

/// A single invocation of a benchmarked operation failed.
#[derive(Debug, Clone, Error)]
pub enum OperationError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Resource probe '{probe}' failed: {reason}")]
    Probe { probe: &'static str, reason: String },

    #[error("{reason}")]
    Failed { reason: String },
}

impl OperationError {
    /// Failure raised by a custom workload.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
