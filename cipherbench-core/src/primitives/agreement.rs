// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! ECDH P-256 and X25519 via `ring::agreement`.

use ring::agreement::{self, EphemeralPrivateKey, PublicKey, UnparsedPublicKey};
use ring::rand::SystemRandom;

use super::Primitive;
use crate::error::{CryptoError, OperationError};
use crate::types::Algorithm;

fn ring_algorithm(algorithm: Algorithm) -> Result<&'static agreement::Algorithm, CryptoError> {
    match algorithm {
        Algorithm::EcdhP256 => Ok(&agreement::ECDH_P256),
        Algorithm::X25519 => Ok(&agreement::X25519),
        other => Err(CryptoError::InvalidKey {
            algorithm: other,
            reason: "not a key agreement algorithm".to_string(),
        }),
    }
}

fn generate(
    algorithm: Algorithm,
    alg: &'static agreement::Algorithm,
    rng: &SystemRandom,
) -> Result<(EphemeralPrivateKey, PublicKey), CryptoError> {
    let key_gen_failed = || CryptoError::KeyGeneration {
        algorithm,
        reason: "ring rejected ephemeral key generation".to_string(),
    };
    let private = EphemeralPrivateKey::generate(alg, rng).map_err(|_| key_gen_failed())?;
    let public = private.compute_public_key().map_err(|_| key_gen_failed())?;
    Ok((private, public))
}

fn agree(
    algorithm: Algorithm,
    alg: &'static agreement::Algorithm,
    private: EphemeralPrivateKey,
    peer_public: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    agreement::agree_ephemeral(
        private,
        &UnparsedPublicKey::new(alg, peer_public),
        |secret| secret.to_vec(),
    )
    .map_err(|_| CryptoError::Agreement { algorithm })
}

/// Times generation of one ephemeral key pair.
pub struct AgreementKeyGen {
    algorithm: Algorithm,
    alg: &'static agreement::Algorithm,
    rng: SystemRandom,
}

impl AgreementKeyGen {
    pub fn new(algorithm: Algorithm) -> Result<Self, CryptoError> {
        Ok(Self {
            algorithm,
            alg: ring_algorithm(algorithm)?,
            rng: SystemRandom::new(),
        })
    }
}

impl Primitive for AgreementKeyGen {
    type Input = ();
    type Output = (EphemeralPrivateKey, PublicKey);

    fn prepare(&mut self) -> Result<(), OperationError> {
        Ok(())
    }

    fn invoke(&mut self, _input: ()) -> Result<Self::Output, OperationError> {
        Ok(generate(self.algorithm, self.alg, &self.rng)?)
    }
}

/// Times one key agreement against a fixed peer.
///
/// The peer key pair is generated once; every call gets a fresh local
/// ephemeral key from `prepare` because agreement consumes it.
pub struct AgreementExchange {
    algorithm: Algorithm,
    alg: &'static agreement::Algorithm,
    rng: SystemRandom,
    peer_public: Option<Vec<u8>>,
}

impl AgreementExchange {
    pub fn new(algorithm: Algorithm) -> Result<Self, CryptoError> {
        Ok(Self {
            algorithm,
            alg: ring_algorithm(algorithm)?,
            rng: SystemRandom::new(),
            peer_public: None,
        })
    }

    fn peer_public(&mut self) -> Result<&[u8], CryptoError> {
        let peer = match self.peer_public.take() {
            Some(peer) => peer,
            None => {
                let (_, public) = generate(self.algorithm, self.alg, &self.rng)?;
                public.as_ref().to_vec()
            }
        };
        Ok(self.peer_public.insert(peer).as_slice())
    }
}

impl Primitive for AgreementExchange {
    type Input = EphemeralPrivateKey;
    type Output = Vec<u8>;

    /// Both parties must derive the same shared secret.
    fn verify(&mut self) -> Result<(), OperationError> {
        let (alice, alice_public) = generate(self.algorithm, self.alg, &self.rng)?;
        let (bob, bob_public) = generate(self.algorithm, self.alg, &self.rng)?;

        let alice_secret = agree(self.algorithm, self.alg, alice, bob_public.as_ref())?;
        let bob_secret = agree(self.algorithm, self.alg, bob, alice_public.as_ref())?;

        if alice_secret != bob_secret {
            return Err(CryptoError::Verification {
                algorithm: self.algorithm,
                reason: "parties derived different shared secrets".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn prepare(&mut self) -> Result<EphemeralPrivateKey, OperationError> {
        self.peer_public()?;
        let (private, _) = generate(self.algorithm, self.alg, &self.rng)?;
        Ok(private)
    }

    fn invoke(&mut self, private: EphemeralPrivateKey) -> Result<Vec<u8>, OperationError> {
        let peer = self
            .peer_public
            .as_deref()
            .ok_or(CryptoError::Agreement {
                algorithm: self.algorithm,
            })?;
        Ok(agree(self.algorithm, self.alg, private, peer)?)
    }
}
