// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! AES-256-GCM and ChaCha20-Poly1305 via `ring::aead`.
//!
//! 32-byte key, 12-byte random nonce, 16-byte tag, empty associated data.

use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use super::{random_nonce, KeyMaterial, Primitive, NONCE_LEN, SYMMETRIC_KEY_LEN, TAG_LEN};
use crate::error::{CryptoError, OperationError};
use crate::types::Algorithm;

fn ring_algorithm(algorithm: Algorithm) -> Result<&'static aead::Algorithm, CryptoError> {
    match algorithm {
        Algorithm::Aes256Gcm => Ok(&aead::AES_256_GCM),
        Algorithm::ChaCha20Poly1305 => Ok(&aead::CHACHA20_POLY1305),
        other => Err(CryptoError::InvalidKey {
            algorithm: other,
            reason: "not an AEAD algorithm".to_string(),
        }),
    }
}

fn less_safe_key(algorithm: Algorithm, key: &[u8]) -> Result<LessSafeKey, CryptoError> {
    let unbound = UnboundKey::new(ring_algorithm(algorithm)?, key).map_err(|_| {
        CryptoError::InvalidKey {
            algorithm,
            reason: format!("rejected {}-byte key", key.len()),
        }
    })?;
    Ok(LessSafeKey::new(unbound))
}

fn seal_with(
    algorithm: Algorithm,
    key: &LessSafeKey,
    nonce: [u8; NONCE_LEN],
    buffer: &mut Vec<u8>,
) -> Result<(), CryptoError> {
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), buffer)
        .map_err(|_| CryptoError::Encrypt {
            algorithm,
            reason: "seal rejected input".to_string(),
        })
}

fn open_with(
    algorithm: Algorithm,
    key: &LessSafeKey,
    nonce: [u8; NONCE_LEN],
    mut buffer: Vec<u8>,
) -> Result<Vec<u8>, CryptoError> {
    let plaintext_len = key
        .open_in_place(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut buffer)
        .map_err(|_| CryptoError::Decrypt {
            algorithm,
            reason: "authentication tag mismatch".to_string(),
        })?
        .len();
    buffer.truncate(plaintext_len);
    Ok(buffer)
}

/// Encrypt `plaintext`, returning ciphertext with the 16-byte tag appended.
pub fn seal(
    algorithm: Algorithm,
    key: &KeyMaterial,
    nonce: [u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = less_safe_key(algorithm, key.as_bytes())?;
    let mut buffer = Vec::with_capacity(plaintext.len() + TAG_LEN);
    buffer.extend_from_slice(plaintext);
    seal_with(algorithm, &key, nonce, &mut buffer)?;
    Ok(buffer)
}

/// Decrypt and authenticate ciphertext produced by [`seal`].
pub fn open(
    algorithm: Algorithm,
    key: &KeyMaterial,
    nonce: [u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = less_safe_key(algorithm, key.as_bytes())?;
    open_with(algorithm, &key, nonce, ciphertext.to_vec())
}

/// Seal then open `payload`, failing unless the plaintext comes back unchanged.
pub fn round_trip(
    algorithm: Algorithm,
    key: &KeyMaterial,
    nonce: [u8; NONCE_LEN],
    payload: &[u8],
) -> Result<(), CryptoError> {
    let ciphertext = seal(algorithm, key, nonce, payload)?;
    if ciphertext.len() != payload.len() + TAG_LEN {
        return Err(CryptoError::Verification {
            algorithm,
            reason: format!(
                "ciphertext is {} bytes, expected {}",
                ciphertext.len(),
                payload.len() + TAG_LEN
            ),
        });
    }

    let recovered = open(algorithm, key, nonce, &ciphertext)?;
    if recovered != payload {
        return Err(CryptoError::Verification {
            algorithm,
            reason: "decrypted bytes differ from the original payload".to_string(),
        });
    }
    Ok(())
}

/// Times construction of a usable AEAD key from fresh random bytes.
pub struct AeadKeyGen {
    algorithm: Algorithm,
    rng: SystemRandom,
}

impl AeadKeyGen {
    pub fn new(algorithm: Algorithm) -> Result<Self, CryptoError> {
        ring_algorithm(algorithm)?;
        Ok(Self {
            algorithm,
            rng: SystemRandom::new(),
        })
    }
}

impl Primitive for AeadKeyGen {
    type Input = ();
    type Output = LessSafeKey;

    fn prepare(&mut self) -> Result<(), OperationError> {
        Ok(())
    }

    fn invoke(&mut self, _input: ()) -> Result<LessSafeKey, OperationError> {
        let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| CryptoError::KeyGeneration {
                algorithm: self.algorithm,
                reason: "system random source unavailable".to_string(),
            })?;
        Ok(less_safe_key(self.algorithm, &bytes)?)
    }
}

/// Times one in-place seal of the message.
pub struct AeadEncrypt {
    algorithm: Algorithm,
    key_material: KeyMaterial,
    key: LessSafeKey,
    message: Vec<u8>,
    rng: SystemRandom,
}

impl AeadEncrypt {
    pub fn new(
        algorithm: Algorithm,
        key_material: KeyMaterial,
        message: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        let key = less_safe_key(algorithm, key_material.as_bytes())?;
        Ok(Self {
            algorithm,
            key_material,
            key,
            message,
            rng: SystemRandom::new(),
        })
    }
}

impl Primitive for AeadEncrypt {
    type Input = ([u8; NONCE_LEN], Vec<u8>);
    type Output = Vec<u8>;

    fn verify(&mut self) -> Result<(), OperationError> {
        let nonce = random_nonce(&self.rng, self.algorithm)?;
        round_trip(self.algorithm, &self.key_material, nonce, &self.message)?;
        Ok(())
    }

    fn prepare(&mut self) -> Result<Self::Input, OperationError> {
        let nonce = random_nonce(&self.rng, self.algorithm)?;
        // Room for the tag so sealing never reallocates inside the window.
        let mut buffer = Vec::with_capacity(self.message.len() + TAG_LEN);
        buffer.extend_from_slice(&self.message);
        Ok((nonce, buffer))
    }

    fn invoke(&mut self, (nonce, mut buffer): Self::Input) -> Result<Vec<u8>, OperationError> {
        seal_with(self.algorithm, &self.key, nonce, &mut buffer)?;
        Ok(buffer)
    }
}

/// Times one in-place open of a freshly sealed message.
pub struct AeadDecrypt {
    algorithm: Algorithm,
    key_material: KeyMaterial,
    key: LessSafeKey,
    message: Vec<u8>,
    rng: SystemRandom,
}

impl AeadDecrypt {
    pub fn new(
        algorithm: Algorithm,
        key_material: KeyMaterial,
        message: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        let key = less_safe_key(algorithm, key_material.as_bytes())?;
        Ok(Self {
            algorithm,
            key_material,
            key,
            message,
            rng: SystemRandom::new(),
        })
    }
}

impl Primitive for AeadDecrypt {
    type Input = ([u8; NONCE_LEN], Vec<u8>);
    type Output = Vec<u8>;

    fn verify(&mut self) -> Result<(), OperationError> {
        let nonce = random_nonce(&self.rng, self.algorithm)?;
        round_trip(self.algorithm, &self.key_material, nonce, &self.message)?;
        Ok(())
    }

    fn prepare(&mut self) -> Result<Self::Input, OperationError> {
        let nonce = random_nonce(&self.rng, self.algorithm)?;
        let mut buffer = Vec::with_capacity(self.message.len() + TAG_LEN);
        buffer.extend_from_slice(&self.message);
        seal_with(self.algorithm, &self.key, nonce, &mut buffer)?;
        Ok((nonce, buffer))
    }

    fn invoke(&mut self, (nonce, buffer): Self::Input) -> Result<Vec<u8>, OperationError> {
        Ok(open_with(self.algorithm, &self.key, nonce, buffer)?)
    }
}
