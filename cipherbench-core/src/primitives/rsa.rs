// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! RSA-2048 key generation and OAEP-SHA256 session-key wrapping via the `rsa` crate.

use rand::rngs::OsRng;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::Primitive;
use crate::error::{CryptoError, OperationError};
use crate::types::Algorithm;

/// Modulus size in bits.
pub const RSA_BITS: usize = 2048;

fn generate_private_key() -> Result<RsaPrivateKey, CryptoError> {
    RsaPrivateKey::new(&mut OsRng, RSA_BITS).map_err(|e| CryptoError::KeyGeneration {
        algorithm: Algorithm::Rsa2048,
        reason: e.to_string(),
    })
}

fn encrypt(public: &RsaPublicKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    public
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), message)
        .map_err(|e| CryptoError::Encrypt {
            algorithm: Algorithm::Rsa2048,
            reason: e.to_string(),
        })
}

fn decrypt(private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    private
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|e| CryptoError::Decrypt {
            algorithm: Algorithm::Rsa2048,
            reason: e.to_string(),
        })
}

/// Key pair generated on first use, outside any measured window.
struct LazyKeyPair {
    keys: Option<(RsaPrivateKey, RsaPublicKey)>,
}

impl LazyKeyPair {
    fn new() -> Self {
        Self { keys: None }
    }

    fn get(&mut self) -> Result<&(RsaPrivateKey, RsaPublicKey), CryptoError> {
        let keys = match self.keys.take() {
            Some(keys) => keys,
            None => {
                let private = generate_private_key()?;
                let public = private.to_public_key();
                (private, public)
            }
        };
        Ok(self.keys.insert(keys))
    }
}

fn verify_round_trip(
    keys: &mut LazyKeyPair,
    session_key: &[u8],
) -> Result<(), OperationError> {
    let (private, public) = keys.get()?;
    let recovered = decrypt(private, &encrypt(public, session_key)?)?;
    if recovered != session_key {
        return Err(CryptoError::Verification {
            algorithm: Algorithm::Rsa2048,
            reason: "unwrapped session key differs from the original".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Times generation of one RSA-2048 private key.
pub struct RsaKeyGen;

impl RsaKeyGen {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RsaKeyGen {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitive for RsaKeyGen {
    type Input = ();
    type Output = RsaPrivateKey;

    fn prepare(&mut self) -> Result<(), OperationError> {
        Ok(())
    }

    fn invoke(&mut self, _input: ()) -> Result<RsaPrivateKey, OperationError> {
        Ok(generate_private_key()?)
    }
}

/// Times wrapping a session key with the public key.
pub struct RsaEncrypt {
    session_key: Vec<u8>,
    keys: LazyKeyPair,
}

impl RsaEncrypt {
    pub fn new(session_key: Vec<u8>) -> Self {
        Self {
            session_key,
            keys: LazyKeyPair::new(),
        }
    }
}

impl Primitive for RsaEncrypt {
    type Input = ();
    type Output = Vec<u8>;

    fn verify(&mut self) -> Result<(), OperationError> {
        verify_round_trip(&mut self.keys, &self.session_key)
    }

    fn prepare(&mut self) -> Result<(), OperationError> {
        self.keys.get()?;
        Ok(())
    }

    fn invoke(&mut self, _input: ()) -> Result<Vec<u8>, OperationError> {
        let (_, public) = self.keys.get()?;
        Ok(encrypt(public, &self.session_key)?)
    }
}

/// Times unwrapping a session key with the private key.
pub struct RsaDecrypt {
    session_key: Vec<u8>,
    keys: LazyKeyPair,
}

impl RsaDecrypt {
    pub fn new(session_key: Vec<u8>) -> Self {
        Self {
            session_key,
            keys: LazyKeyPair::new(),
        }
    }
}

impl Primitive for RsaDecrypt {
    type Input = Vec<u8>;
    type Output = Vec<u8>;

    fn verify(&mut self) -> Result<(), OperationError> {
        verify_round_trip(&mut self.keys, &self.session_key)
    }

    fn prepare(&mut self) -> Result<Vec<u8>, OperationError> {
        let (_, public) = self.keys.get()?;
        Ok(encrypt(public, &self.session_key)?)
    }

    fn invoke(&mut self, ciphertext: Vec<u8>) -> Result<Vec<u8>, OperationError> {
        let (private, _) = self.keys.get()?;
        Ok(decrypt(private, &ciphertext)?)
    }
}
