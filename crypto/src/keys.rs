//! Key management for ballot participants
//!
//! Handles key generation, key files, and address derivation.

use ballot_core::{Address, BallotError, BallotResult, PublicKey};
use ed25519_dalek::{
    SigningKey as Ed25519SigningKey,
    VerifyingKey as Ed25519VerifyingKey,
    SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hashing::blake3_hash;

/// A keypair for signing and verification
#[derive(Clone)]
pub struct KeyPair {
    signing_key: Ed25519SigningKey,
}

impl KeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let signing_key = Ed25519SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create keypair from seed bytes
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = Ed25519SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create keypair from secret key bytes
    pub fn from_secret_bytes(bytes: &[u8]) -> BallotResult<Self> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(BallotError::InvalidPrivateKey);
        }
        let secret = SecretKey::from_slice(bytes);
        Ok(secret.to_keypair())
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        PublicKey::from_bytes(verifying_key.to_bytes())
    }

    /// Get the address (hash of public key)
    pub fn address(&self) -> Address {
        address_from_public_key(&self.public_key())
    }

    /// Get the secret key bytes
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &Ed25519SigningKey {
        &self.signing_key
    }
}

/// Derive address from public key using BLAKE3 hash
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let hash = blake3_hash(public_key.as_bytes());
    Address::from_bytes(*hash.as_bytes())
}

/// Verify that an address matches a public key
pub fn verify_address(address: &Address, public_key: &PublicKey) -> bool {
    let derived = address_from_public_key(public_key);
    address == &derived
}

/// Convert our PublicKey type to Ed25519 verifying key
pub fn public_key_to_ed25519(key: &PublicKey) -> BallotResult<Ed25519VerifyingKey> {
    Ed25519VerifyingKey::from_bytes(key.as_bytes())
        .map_err(|_| BallotError::InvalidPublicKey)
}

/// Secret key bytes, zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; 32],
}

impl SecretKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    fn from_slice(bytes: &[u8]) -> Self {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        let secret = Self::new(arr);
        arr.zeroize();
        secret
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_keypair(&self) -> KeyPair {
        KeyPair::from_seed(&self.bytes)
    }
}

/// On-disk key file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFile {
    pub public_key: String,
    pub address: String,
    pub secret_key: String,
}

impl KeyFile {
    /// Rebuild the keypair, checking the stored address still matches
    pub fn to_keypair(&self) -> BallotResult<KeyPair> {
        let secret = hex::decode(&self.secret_key).map_err(|_| BallotError::InvalidPrivateKey)?;
        let keypair = KeyPair::from_secret_bytes(&secret)?;
        if keypair.address().to_hex() != self.address {
            return Err(BallotError::InvalidAddress(
                "Key file address does not match secret key".into(),
            ));
        }
        Ok(keypair)
    }
}

impl From<&KeyPair> for KeyFile {
    fn from(keypair: &KeyPair) -> Self {
        Self {
            public_key: keypair.public_key().to_hex(),
            address: keypair.address().to_hex(),
            secret_key: hex::encode(keypair.secret_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let kp = KeyPair::generate();
        let pubkey = kp.public_key();
        let addr = kp.address();

        assert!(verify_address(&addr, &pubkey));
    }

    #[test]
    fn test_keypair_from_seed() {
        let seed = [42u8; 32];
        let kp1 = KeyPair::from_seed(&seed);
        let kp2 = KeyPair::from_seed(&seed);

        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_secret_bytes_length() {
        assert!(matches!(
            KeyPair::from_secret_bytes(&[1u8; 16]),
            Err(BallotError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_key_file() {
        let kp = KeyPair::generate();
        let file = KeyFile::from(&kp);
        let restored = file.to_keypair().unwrap();
        assert_eq!(restored.address(), kp.address());

        let tampered = KeyFile {
            address: KeyPair::generate().address().to_hex(),
            ..file
        };
        assert!(tampered.to_keypair().is_err());
    }
}
