//! Deterministic stand-in for a signature scheme.
//!
//! A "signature" by `identity` over `message` is
//! `sha256(identity word || message)`. Anyone can forge it, which is exactly
//! what tests and demos need; production deployments plug in a real
//! [`SignatureVerifier`].

use sha2::{Digest, Sha256};

use crate::external::SignatureVerifier;
use crate::types::Address;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockVerifier;

impl MockVerifier {
    /// Produce the proof this verifier accepts
    pub fn sign(identity: &Address, message: &[u8; 32]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(identity.to_word());
        hasher.update(message);
        hasher.finalize().to_vec()
    }
}

impl SignatureVerifier for MockVerifier {
    fn verify(&self, identity: &Address, message: &[u8; 32], proof: &[u8]) -> bool {
        Self::sign(identity, message) == proof
    }
}
