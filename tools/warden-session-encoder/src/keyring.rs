//! ECDSA keyring backed by k256.
//!
//! Keys are addressed by a 32-byte identifier (keccak of the uncompressed
//! public key), matching the key identifiers the core stores for owners and
//! sessions. Signatures surface as `(r, s)` word pairs.

use std::collections::BTreeMap;

use alloy_primitives::{B256, U256};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::FieldBytes;
use sha3::{Digest, Keccak256};
use warden_account_types::SignatureVerifier;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyringError {
    UnknownKey,
    SigningFailed,
}

/// In-memory signer/verifier for deterministic test keypairs.
#[derive(Default)]
pub struct Keyring {
    signers: BTreeMap<B256, SigningKey>,
    verifiers: BTreeMap<B256, VerifyingKey>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a keypair from a seed and register it, returning its key id.
    pub fn generate(&mut self, seed: u64) -> B256 {
        let mut counter = 0u64;
        loop {
            let mut hasher = Keccak256::new();
            hasher.update(seed.to_be_bytes());
            hasher.update(counter.to_be_bytes());
            let material: [u8; 32] = hasher.finalize().into();
            // Retry on the negligible chance the digest is not a valid scalar.
            if let Ok(signer) = SigningKey::from_bytes(&FieldBytes::from(material)) {
                let verifier = *signer.verifying_key();
                let key_id = key_id_of(&verifier);
                self.signers.insert(key_id, signer);
                self.verifiers.insert(key_id, verifier);
                return key_id;
            }
            counter += 1;
        }
    }

    /// Sign a 32-byte digest with the key behind `key_id`.
    pub fn sign(&self, key_id: B256, digest: B256) -> Result<(U256, U256), KeyringError> {
        let signer = self.signers.get(&key_id).ok_or(KeyringError::UnknownKey)?;
        let signature: Signature = signer
            .sign_prehash(digest.as_slice())
            .map_err(|_| KeyringError::SigningFailed)?;
        let (r, s) = signature.split_bytes();
        Ok((U256::from_be_slice(&r), U256::from_be_slice(&s)))
    }
}

impl SignatureVerifier for Keyring {
    fn verify(&self, digest: B256, key: B256, r: U256, s: U256) -> bool {
        let Some(verifier) = self.verifiers.get(&key) else {
            return false;
        };
        let r_bytes = FieldBytes::from(r.to_be_bytes::<32>());
        let s_bytes = FieldBytes::from(s.to_be_bytes::<32>());
        let Ok(signature) = Signature::from_scalars(r_bytes, s_bytes) else {
            return false;
        };
        verifier.verify_prehash(digest.as_slice(), &signature).is_ok()
    }
}

fn key_id_of(verifier: &VerifyingKey) -> B256 {
    let encoded = verifier.to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(encoded.as_bytes());
    B256::from_slice(&hasher.finalize())
}
