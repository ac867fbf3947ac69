// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Adapters between the harness and the external cryptography libraries.
//!
//! Every benchmarked call is split in two: [`Primitive::prepare`] builds the
//! inputs outside the measured window (fresh ephemeral keys, ciphertext to
//! open, pre-sized output buffers) and [`Primitive::invoke`] performs the one
//! library call being timed. Whatever `invoke` returns is dropped by the
//! caller after the closing measurement, so output buffers never count
//! towards the memory delta.

use std::fmt;

use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{CryptoError, OperationError};
use crate::types::Algorithm;

pub mod aead;
pub mod agreement;
pub mod rsa;

pub use self::aead::{AeadDecrypt, AeadEncrypt, AeadKeyGen};
pub use self::agreement::{AgreementExchange, AgreementKeyGen};
pub use self::rsa::{RsaDecrypt, RsaEncrypt, RsaKeyGen};

/// Symmetric key length shared by AES-256-GCM and ChaCha20-Poly1305.
pub const SYMMETRIC_KEY_LEN: usize = 32;
/// AEAD nonce length.
pub const NONCE_LEN: usize = ring::aead::NONCE_LEN;
/// AEAD authentication tag length.
pub const TAG_LEN: usize = 16;

/// One benchmarkable library call.
pub trait Primitive {
    /// Arguments for one timed call.
    type Input;
    /// Library output, discarded after measurement.
    type Output;

    /// Correctness precondition checked once before any timing is trusted.
    fn verify(&mut self) -> Result<(), OperationError> {
        Ok(())
    }

    /// Untimed per-call setup.
    fn prepare(&mut self) -> Result<Self::Input, OperationError>;

    /// The timed call.
    fn invoke(&mut self, input: Self::Input) -> Result<Self::Output, OperationError>;
}

/// A closure-backed primitive for custom workloads.
pub struct FnPrimitive<F> {
    call: F,
}

/// Wrap a closure as a [`Primitive`] with no untimed setup.
pub fn from_fn<F, T>(call: F) -> FnPrimitive<F>
where
    F: FnMut() -> Result<T, OperationError>,
{
    FnPrimitive { call }
}

impl<F, T> Primitive for FnPrimitive<F>
where
    F: FnMut() -> Result<T, OperationError>,
{
    type Input = ();
    type Output = T;

    fn prepare(&mut self) -> Result<(), OperationError> {
        Ok(())
    }

    fn invoke(&mut self, _input: ()) -> Result<T, OperationError> {
        (self.call)()
    }
}

/// 32 bytes of symmetric key material.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial([u8; SYMMETRIC_KEY_LEN]);

impl KeyMaterial {
    /// Fresh random key from the system generator.
    pub fn generate(algorithm: Algorithm) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| CryptoError::KeyGeneration {
                algorithm,
                reason: "system random source unavailable".to_string(),
            })?;
        Ok(Self(bytes))
    }

    /// Fixed key, e.g. for reproducible correctness checks.
    pub fn from_bytes(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SYMMETRIC_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKey {
                algorithm,
                reason: format!(
                    "expected {} bytes, got {}",
                    SYMMETRIC_KEY_LEN,
                    bytes.len()
                ),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial([REDACTED; {}])", SYMMETRIC_KEY_LEN)
    }
}

/// Fresh random nonce.
pub(crate) fn random_nonce(
    rng: &SystemRandom,
    algorithm: Algorithm,
) -> Result<[u8; NONCE_LEN], CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut nonce).map_err(|_| CryptoError::Encrypt {
        algorithm,
        reason: "system random source unavailable".to_string(),
    })?;
    Ok(nonce)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_material_length_checked() {
        assert!(KeyMaterial::from_bytes(Algorithm::Aes256Gcm, &[7u8; 32]).is_ok());
        let err = KeyMaterial::from_bytes(Algorithm::Aes256Gcm, &[7u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey { .. }));
    }

    #[test]
    fn test_generated_keys_are_independent() {
        let a = KeyMaterial::generate(Algorithm::Aes256Gcm).unwrap();
        let b = KeyMaterial::generate(Algorithm::Aes256Gcm).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_material_debug_redacted() {
        let key = KeyMaterial::from_bytes(Algorithm::ChaCha20Poly1305, &[0xAB; 32]).unwrap();
        let text = format!("{:?}", key);
        assert!(text.contains("REDACTED"));
        assert!(!text.contains("171"));
    }

    #[test]
    fn test_from_fn() {
        let mut calls = 0;
        let mut primitive = from_fn(|| {
            calls += 1;
            Ok::<_, OperationError>(calls)
        });
        primitive.prepare().unwrap();
        assert_eq!(primitive.invoke(()).unwrap(), 1);
        assert_eq!(primitive.invoke(()).unwrap(), 2);
    }
}
