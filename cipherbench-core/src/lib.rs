//! cipherbench Core Library
//!
//! Core types for the cipherbench micro-benchmark framework.
//! Provides the error taxonomy, validated benchmark descriptions, suite
//! configuration parsing, payload fixtures and the adapters that call into
//! the external cryptography libraries.

pub mod config;
pub mod error;
pub mod fixture;
pub mod primitives;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigLoader, SuiteConfig, SuiteSettings};
pub use error::{BenchError, BenchResult, CryptoError, HardValidationError, OperationError};
pub use fixture::{Payload, PayloadSource};
pub use primitives::{KeyMaterial, Primitive};
pub use types::{Algorithm, BenchmarkName, BenchmarkSpec, IterationCount, Operation, PayloadSize};
