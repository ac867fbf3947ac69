// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers and the benchmark description.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Maximum number of measured iterations for a single benchmark.
const MAX_ITERATIONS: u64 = 1_000_000;
/// Maximum payload size: 64 MiB
const MAX_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;
/// Largest message RSA-2048 OAEP-SHA256 can wrap: k - 2*hLen - 2 = 256 - 64 - 2.
pub const RSA_OAEP_MAX_INPUT: usize = 190;

/// Cryptographic algorithms the suite can time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "rsa2048")]
    Rsa2048,
    #[serde(rename = "ecdh-p256")]
    EcdhP256,
    #[serde(rename = "x25519")]
    X25519,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Rsa2048,
        Algorithm::EcdhP256,
        Algorithm::X25519,
        Algorithm::Aes256Gcm,
        Algorithm::ChaCha20Poly1305,
    ];

    /// Machine-friendly identifier, identical to the suite file spelling.
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Rsa2048 => "rsa2048",
            Algorithm::EcdhP256 => "ecdh-p256",
            Algorithm::X25519 => "x25519",
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    /// Operations that make sense for this algorithm.
    pub fn operations(&self) -> &'static [Operation] {
        match self {
            Algorithm::Rsa2048 | Algorithm::Aes256Gcm | Algorithm::ChaCha20Poly1305 => {
                &[Operation::KeyGen, Operation::Encrypt, Operation::Decrypt]
            }
            Algorithm::EcdhP256 | Algorithm::X25519 => &[Operation::KeyGen, Operation::Exchange],
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Whether the algorithm is an AEAD cipher.
    pub fn is_aead(&self) -> bool {
        matches!(self, Algorithm::Aes256Gcm | Algorithm::ChaCha20Poly1305)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Rsa2048 => write!(f, "RSA-2048"),
            Algorithm::EcdhP256 => write!(f, "ECDH P-256"),
            Algorithm::X25519 => write!(f, "X25519"),
            Algorithm::Aes256Gcm => write!(f, "AES-256-GCM"),
            Algorithm::ChaCha20Poly1305 => write!(f, "ChaCha20-Poly1305"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(wanted) || a.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HardValidationError::InvalidFieldValue {
                field: "algorithm",
                value: s.to_string(),
                reason: format!(
                    "Expected one of: {}",
                    Algorithm::ALL.map(|a| a.id()).join(", ")
                ),
            })
    }
}

/// The operation being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[serde(rename = "keygen")]
    KeyGen,
    Encrypt,
    Decrypt,
    Exchange,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::KeyGen => write!(f, "keygen"),
            Operation::Encrypt => write!(f, "encrypt"),
            Operation::Decrypt => write!(f, "decrypt"),
            Operation::Exchange => write!(f, "exchange"),
        }
    }
}

/// Validated benchmark name.
/// Must be non-empty, alphanumeric with hyphens/underscores/dots, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BenchmarkName(String);

impl BenchmarkName {
    /// Create a new BenchmarkName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name,
                reason: "Benchmark name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name.clone(),
                reason: format!("Benchmark name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "name",
                value: name,
                reason: "Benchmark name must contain only alphanumeric characters, hyphens, underscores, and dots".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BenchmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BenchmarkName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BenchmarkName> for String {
    fn from(name: BenchmarkName) -> Self {
        name.0
    }
}

/// Validated number of measured repetitions.
/// Must be in range 1..=MAX_ITERATIONS; a series is never empty by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct IterationCount(u64);

impl IterationCount {
    pub fn new(count: u64) -> Result<Self, HardValidationError> {
        if count == 0 || count > MAX_ITERATIONS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "iterations",
                value: count.to_string(),
                reason: format!("Must be between 1 and {}", MAX_ITERATIONS),
            });
        }
        Ok(Self(count))
    }

    /// Create without validation (for compile-time constants only).
    pub(crate) const fn new_unchecked(count: u64) -> Self {
        Self(count)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for IterationCount {
    type Error = HardValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IterationCount> for u64 {
    fn from(count: IterationCount) -> Self {
        count.0
    }
}

/// Validated input size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PayloadSize(usize);

impl PayloadSize {
    pub fn new(bytes: usize) -> Result<Self, HardValidationError> {
        if bytes > MAX_PAYLOAD_BYTES {
            return Err(HardValidationError::InvalidFieldValue {
                field: "input_size_bytes",
                value: bytes.to_string(),
                reason: format!("Must not exceed {} bytes", MAX_PAYLOAD_BYTES),
            });
        }
        Ok(Self(bytes))
    }

    /// Create without validation (for compile-time constants only).
    pub(crate) const fn new_unchecked(bytes: usize) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> usize {
        self.0
    }

    /// Size in kilobytes for display.
    pub fn kilobytes(&self) -> f64 {
        self.0 as f64 / 1024.0
    }
}

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B", self.0)
    }
}

impl TryFrom<usize> for PayloadSize {
    type Error = HardValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PayloadSize> for usize {
    fn from(size: PayloadSize) -> Self {
        size.0
    }
}

/// A single registered benchmark: one algorithm × one operation.
///
/// Immutable once built; the only constructor validates that the operation
/// is meaningful for the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    name: BenchmarkName,
    algorithm: Algorithm,
    operation: Operation,
    input_size_bytes: PayloadSize,
    iterations: IterationCount,
    warmup_iterations: u64,
    /// Input size is a placeholder to be replaced by the payload length.
    #[serde(skip)]
    input_follows_payload: bool,
}

impl BenchmarkSpec {
    pub fn new(
        name: BenchmarkName,
        algorithm: Algorithm,
        operation: Operation,
        input_size_bytes: PayloadSize,
        iterations: IterationCount,
        warmup_iterations: u64,
    ) -> Result<Self, HardValidationError> {
        if !algorithm.supports(operation) {
            return Err(HardValidationError::UnsupportedOperation {
                algorithm,
                operation,
            });
        }

        if algorithm == Algorithm::Rsa2048
            && matches!(operation, Operation::Encrypt | Operation::Decrypt)
            && !(1..=RSA_OAEP_MAX_INPUT).contains(&input_size_bytes.bytes())
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "input_size_bytes",
                value: input_size_bytes.bytes().to_string(),
                reason: format!(
                    "RSA-2048 OAEP can wrap between 1 and {} bytes",
                    RSA_OAEP_MAX_INPUT
                ),
            });
        }

        if warmup_iterations > MAX_ITERATIONS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "warmup_iterations",
                value: warmup_iterations.to_string(),
                reason: format!("Must not exceed {}", MAX_ITERATIONS),
            });
        }

        Ok(Self {
            name,
            algorithm,
            operation,
            input_size_bytes,
            iterations,
            warmup_iterations,
            input_follows_payload: false,
        })
    }

    /// Mark the input size as "whole payload": [`sized_for`](Self::sized_for)
    /// will replace it with the length of the payload actually loaded.
    /// Only AEAD encrypt and decrypt consume the payload; other specs are
    /// returned unchanged.
    pub fn following_payload(mut self) -> Self {
        self.input_follows_payload = self.algorithm.is_aead()
            && matches!(self.operation, Operation::Encrypt | Operation::Decrypt);
        self
    }

    pub fn input_follows_payload(&self) -> bool {
        self.input_follows_payload
    }

    /// This benchmark bound to a payload of `payload_size` bytes.
    ///
    /// Explicit input sizes are kept as they are.
    pub fn sized_for(&self, payload_size: PayloadSize) -> Self {
        let mut spec = self.clone();
        if spec.input_follows_payload {
            spec.input_size_bytes = payload_size;
            spec.input_follows_payload = false;
        }
        spec
    }

    pub fn name(&self) -> &BenchmarkName {
        &self.name
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn input_size(&self) -> PayloadSize {
        self.input_size_bytes
    }

    pub fn iterations(&self) -> u64 {
        self.iterations.get()
    }

    pub fn warmup_iterations(&self) -> u64 {
        self.warmup_iterations
    }

    /// Same benchmark under a different name.
    pub fn renamed(&self, name: BenchmarkName) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }
}
