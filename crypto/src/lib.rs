//! Ballot Cryptography Module
//!
//! Provides the primitives the node uses to authenticate callers:
//! - Ed25519 for signatures
//! - BLAKE3 for hashing and address derivation

pub mod keys;
pub mod signing;
pub mod hashing;

pub use keys::*;
pub use signing::*;
pub use hashing::*;
