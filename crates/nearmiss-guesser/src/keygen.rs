//! Candidate addresses from random secp256k1 keypairs

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use nearmiss_core::Address;
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use tiny_keccak::{Hasher, Keccak};

use crate::error::{GuesserError, Result};

/// One generated keypair, reduced to what the search needs
#[derive(Clone, PartialEq, Eq)]
pub struct Guess {
    pub secret: [u8; 32],
    pub address: Address,
}

impl Guess {
    /// Private key as 64 lowercase hex digits
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret)
    }
}

impl std::fmt::Debug for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guess").field("address", &self.address).finish_non_exhaustive()
    }
}

/// Supplies a fresh candidate per call
pub trait IdentifierSource {
    fn next_guess(&mut self) -> Guess;
}

/// Draws private keys from a cryptographic RNG
pub struct KeypairSource<R> {
    rng: R,
}

impl KeypairSource<ThreadRng> {
    /// Source backed by the thread-local OS-seeded RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: RngCore + CryptoRng> KeypairSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + CryptoRng> IdentifierSource for KeypairSource<R> {
    fn next_guess(&mut self) -> Guess {
        let secret = SecretKey::random(&mut self.rng);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&secret.to_bytes());
        Guess {
            secret: bytes,
            address: address_of(&secret),
        }
    }
}

/// Ethereum address of a key: last 20 bytes of keccak-256 over the
/// uncompressed public key without its `0x04` tag
pub fn address_of(secret: &SecretKey) -> Address {
    let public = secret.public_key().to_encoded_point(false);

    let mut hasher = Keccak::v256();
    hasher.update(&public.as_bytes()[1..]);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from(bytes)
}

/// Address for a hex-encoded private key
pub fn address_from_private_hex(private_key: &str) -> Result<Address> {
    let trimmed = private_key.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| GuesserError::InvalidKey(e.to_string()))?;
    let secret = SecretKey::from_slice(&bytes).map_err(|e| GuesserError::InvalidKey(e.to_string()))?;
    Ok(address_of(&secret))
}
