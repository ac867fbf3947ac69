// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Integration tests for cipherbench-core.
//!
//! These tests verify the flow from a suite file on disk to validated
//! benchmark descriptions, payload fixtures and working library adapters.

use cipherbench_core::primitives::aead::round_trip;
use cipherbench_core::primitives::{AeadDecrypt, AgreementExchange, RsaEncrypt};
use cipherbench_core::{
    Algorithm, BenchError, ConfigLoader, KeyMaterial, Operation, Payload, PayloadSource, Primitive,
};
use tempfile::TempDir;

/// Test suite loading and validation from a file
#[test]
fn test_suite_file_loading() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let fixture_path = temp_dir.path().join("agc.json");
    std::fs::write(&fixture_path, br#"{"setpoint": 42, "unit": "MW"}"#)
        .expect("Failed to write fixture");

    let suite_path = temp_dir.path().join("suite.yaml");
    std::fs::write(
        &suite_path,
        r#"
suite:
  name: opgw-agc
  payload_file: agc.json
  iterations: 50
  warmup_iterations: 5

benchmarks:
  - name: rsa2048-keygen
    algorithm: rsa2048
    operation: keygen
    iterations: 10
    warmup_iterations: 2
  - name: x25519-exchange
    algorithm: x25519
    operation: exchange
  - name: aes-gcm-encrypt
    algorithm: aes-256-gcm
    operation: encrypt
    input_size_bytes: 4096
"#,
    )
    .expect("Failed to write suite");

    let suite = ConfigLoader::load_file(&suite_path).expect("Suite should load");
    assert_eq!(suite.settings.name, "opgw-agc");
    assert_eq!(suite.benchmarks.len(), 3);

    // Relative fixture path resolved against the suite file
    let payload_file = suite.settings.payload_file.clone().unwrap();
    assert_eq!(payload_file, fixture_path);

    let keygen = &suite.benchmarks[0];
    assert_eq!(keygen.iterations(), 10);
    assert_eq!(keygen.warmup_iterations(), 2);

    let exchange = &suite.benchmarks[1];
    assert_eq!(exchange.algorithm(), Algorithm::X25519);
    assert_eq!(exchange.operation(), Operation::Exchange);
    assert_eq!(exchange.iterations(), 50);
    assert_eq!(exchange.warmup_iterations(), 5);

    assert_eq!(suite.benchmarks[2].input_size().bytes(), 4096);

    let payload = Payload::from_file(&payload_file).expect("Fixture should load");
    assert_eq!(payload.len(), 30);
    assert!(matches!(payload.source(), PayloadSource::File(_)));
}

/// Test that invalid suites are rejected before anything runs
#[test]
fn test_invalid_suites_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let cases = [
        (
            "duplicate.yaml",
            r#"
benchmarks:
  - name: twice
    algorithm: x25519
    operation: keygen
  - name: twice
    algorithm: ecdh-p256
    operation: keygen
"#,
        ),
        (
            "unsupported.yaml",
            r#"
benchmarks:
  - name: x25519-encrypt
    algorithm: x25519
    operation: encrypt
"#,
        ),
        (
            "oversized-rsa.yaml",
            r#"
benchmarks:
  - name: rsa-big
    algorithm: rsa2048
    operation: encrypt
    input_size_bytes: 512
"#,
        ),
        ("empty.yaml", "benchmarks: []\n"),
    ];

    for (file, content) in cases {
        let path = temp_dir.path().join(file);
        std::fs::write(&path, content).expect("Failed to write suite");
        assert!(
            ConfigLoader::load_file(&path).is_err(),
            "{} should be rejected",
            file
        );
    }

    let duplicate = ConfigLoader::load_file(temp_dir.path().join("duplicate.yaml"));
    assert!(matches!(duplicate, Err(BenchError::DuplicateBenchmark { .. })));

    let missing = ConfigLoader::load_file(temp_dir.path().join("missing.yaml"));
    assert!(matches!(missing, Err(BenchError::ConfigNotFound { .. })));
}

/// AES-256-GCM round trip of 1024 zero bytes under a fixed key
#[test]
fn test_fixed_key_aes_gcm_round_trip() {
    let key = KeyMaterial::from_bytes(Algorithm::Aes256Gcm, &[0x42; 32]).unwrap();
    let payload = vec![0u8; 1024];
    round_trip(Algorithm::Aes256Gcm, &key, [7u8; 12], &payload).unwrap();
}

/// Adapters pass their correctness checks and produce output
#[test]
fn test_adapters_verify_and_invoke() {
    let message = Payload::synthetic(cipherbench_core::PayloadSize::new(256).unwrap()).prefix(256);

    let key = KeyMaterial::generate(Algorithm::ChaCha20Poly1305).unwrap();
    let mut decrypt = AeadDecrypt::new(Algorithm::ChaCha20Poly1305, key, message.clone()).unwrap();
    decrypt.verify().unwrap();
    let input = decrypt.prepare().unwrap();
    assert_eq!(decrypt.invoke(input).unwrap(), message);

    for algorithm in [Algorithm::EcdhP256, Algorithm::X25519] {
        let mut exchange = AgreementExchange::new(algorithm).unwrap();
        exchange.verify().unwrap();
        let input = exchange.prepare().unwrap();
        exchange.invoke(input).unwrap();
    }

    let mut wrap = RsaEncrypt::new(vec![0xA5; 32]);
    wrap.verify().unwrap();
    wrap.prepare().unwrap();
    assert_eq!(wrap.invoke(()).unwrap().len(), 256);
}
