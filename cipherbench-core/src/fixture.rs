// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark payloads.
//!
//! The payload is opaque to the harness. Its CRC-32 travels with every report
//! so two runs over different fixtures are never mistaken for comparable.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::types::PayloadSize;

/// Where the payload bytes came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PayloadSource {
    /// Deterministic generated pattern.
    Synthetic,
    /// All-zero buffer.
    Zeroed,
    /// Loaded from a fixture file.
    File(String),
}

impl fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadSource::Synthetic => write!(f, "synthetic"),
            PayloadSource::Zeroed => write!(f, "zeroed"),
            PayloadSource::File(path) => write!(f, "file:{}", path),
        }
    }
}

/// Payload bytes fed to symmetric benchmarks.
#[derive(Debug, Clone)]
pub struct Payload {
    bytes: Vec<u8>,
    checksum: u32,
    source: PayloadSource,
}

impl Payload {
    fn build(bytes: Vec<u8>, source: PayloadSource) -> BenchResult<Self> {
        PayloadSize::new(bytes.len())?;
        let checksum = crc32fast::hash(&bytes);
        Ok(Self {
            bytes,
            checksum,
            source,
        })
    }

    /// Deterministic byte pattern of the given size. Identical across runs and hosts.
    pub fn synthetic(size: PayloadSize) -> Self {
        let bytes: Vec<u8> = (0..size.bytes()).map(|i| (i % 251) as u8).collect();
        let checksum = crc32fast::hash(&bytes);
        Self {
            bytes,
            checksum,
            source: PayloadSource::Synthetic,
        }
    }

    /// All-zero payload of the given size.
    pub fn zeroed(size: PayloadSize) -> Self {
        let bytes = vec![0u8; size.bytes()];
        let checksum = crc32fast::hash(&bytes);
        Self {
            bytes,
            checksum,
            source: PayloadSource::Zeroed,
        }
    }

    /// Load a fixture file verbatim.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| BenchError::Io {
            context: "reading payload fixture",
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Loaded payload fixture");
        Self::build(bytes, PayloadSource::File(path.display().to_string()))
    }

    /// Wrap caller-provided bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> BenchResult<Self> {
        Self::build(bytes, PayloadSource::Synthetic)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length as a validated size; bounded at construction.
    pub fn size(&self) -> PayloadSize {
        PayloadSize::new_unchecked(self.bytes.len())
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn source(&self) -> &PayloadSource {
        &self.source
    }

    /// First `size` bytes, cycling the payload if it is shorter.
    pub fn prefix(&self, size: usize) -> Vec<u8> {
        if self.bytes.is_empty() {
            return vec![0u8; size];
        }
        self.bytes.iter().copied().cycle().take(size).collect()
    }
}
