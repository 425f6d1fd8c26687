//! Core traits defining ballot interfaces
//!
//! These traits define the seams between the engine and its external
//! collaborators.

use crate::types::*;

/// Result type for ballot operations
pub type BallotResult<T> = Result<T, crate::error::BallotError>;

/// Trait for hashable types
pub trait Hashable {
    /// Compute the hash of this object
    fn hash(&self) -> Hash;
}

/// Trait for signable types
pub trait Signable {
    /// Get the bytes to be signed
    fn signing_bytes(&self) -> Vec<u8>;
}

/// Source of the current time.
///
/// The engine never reads a clock; whoever hosts it reads one of these and
/// passes the value into every time-sensitive operation.
pub trait Clock: Send + Sync {
    /// Current time, second granularity, non-decreasing
    fn now(&self) -> Timestamp;
}
