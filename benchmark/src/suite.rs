// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Wiring of suite descriptions to concrete library adapters.

use cipherbench_core::primitives::{
    AeadDecrypt, AeadEncrypt, AeadKeyGen, AgreementExchange, AgreementKeyGen, RsaDecrypt,
    RsaEncrypt, RsaKeyGen,
};
use cipherbench_core::{
    Algorithm, BenchResult, BenchmarkSpec, HardValidationError, KeyMaterial, Operation,
    OperationError, Payload, SuiteConfig,
};

use crate::harness::Measurable;
use crate::registry::BenchmarkRegistry;

/// Build the adapter that measures `spec`.
///
/// Symmetric benchmarks get their own freshly generated key. Messages are
/// taken from the shared payload, truncated or cycled to the input size.
pub fn measurable_for(spec: &BenchmarkSpec, payload: &Payload) -> BenchResult<Box<dyn Measurable>> {
    let input = || payload.prefix(spec.input_size().bytes());
    let algorithm = spec.algorithm();

    let op: Box<dyn Measurable> = match (algorithm, spec.operation()) {
        (Algorithm::Rsa2048, Operation::KeyGen) => Box::new(RsaKeyGen::new()),
        (Algorithm::Rsa2048, Operation::Encrypt) => Box::new(RsaEncrypt::new(input())),
        (Algorithm::Rsa2048, Operation::Decrypt) => Box::new(RsaDecrypt::new(input())),
        (Algorithm::EcdhP256 | Algorithm::X25519, Operation::KeyGen) => {
            Box::new(AgreementKeyGen::new(algorithm).map_err(OperationError::from)?)
        }
        (Algorithm::EcdhP256 | Algorithm::X25519, Operation::Exchange) => {
            Box::new(AgreementExchange::new(algorithm).map_err(OperationError::from)?)
        }
        (Algorithm::Aes256Gcm | Algorithm::ChaCha20Poly1305, operation) => {
            match operation {
                Operation::KeyGen => {
                    Box::new(AeadKeyGen::new(algorithm).map_err(OperationError::from)?)
                }
                Operation::Encrypt => Box::new(
                    AeadEncrypt::new(algorithm, fresh_key(algorithm)?, input())
                        .map_err(OperationError::from)?,
                ),
                Operation::Decrypt => Box::new(
                    AeadDecrypt::new(algorithm, fresh_key(algorithm)?, input())
                        .map_err(OperationError::from)?,
                ),
                Operation::Exchange => return Err(unsupported(spec)),
            }
        }
        _ => return Err(unsupported(spec)),
    };

    Ok(op)
}

fn fresh_key(algorithm: Algorithm) -> BenchResult<KeyMaterial> {
    Ok(KeyMaterial::generate(algorithm).map_err(OperationError::from)?)
}

fn unsupported(spec: &BenchmarkSpec) -> cipherbench_core::BenchError {
    HardValidationError::UnsupportedOperation {
        algorithm: spec.algorithm(),
        operation: spec.operation(),
    }
    .into()
}

/// Register every benchmark of `suite` in suite order.
///
/// Specs without an explicit input size are bound to the full payload
/// first, so a fixture is encrypted whole. Fails on the first duplicate
/// name or adapter that cannot be built; nothing has been measured at that
/// point.
pub fn build_registry(suite: &SuiteConfig, payload: &Payload) -> BenchResult<BenchmarkRegistry> {
    let mut registry = BenchmarkRegistry::new();
    for spec in &suite.benchmarks {
        let spec = spec.sized_for(payload.size());
        let op = measurable_for(&spec, payload)?;
        registry.register(spec, op)?;
    }
    tracing::debug!(benchmarks = registry.len(), "Registry built");
    Ok(registry)
}
