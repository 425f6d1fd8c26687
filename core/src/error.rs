//! Error types for the ballot

use crate::types::{Address, BallotId, ProposalIndex, Timestamp};
use thiserror::Error;

/// Main error type for the ballot
#[derive(Error, Debug)]
pub enum BallotError {
    // ============ Ballot Rule Errors ============
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Participant {0} has already voted")]
    AlreadyVoted(Address),

    #[error("Voting closed: deadline {deadline}, now {now}")]
    VotingClosed { deadline: Timestamp, now: Timestamp },

    #[error("Invalid proposal index {index} (ballot has {count} proposals)")]
    InvalidProposal { index: ProposalIndex, count: usize },

    // ============ Cryptography Errors ============
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    // ============ Transaction Errors ============
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid proposal label: {0}")]
    InvalidLabel(String),

    #[error("Transaction targets ballot {got}, expected {expected}")]
    WrongBallot { expected: BallotId, got: BallotId },

    #[error("Message serialization failed: {0}")]
    SerializationError(String),

    #[error("Message deserialization failed: {0}")]
    DeserializationError(String),

    // ============ Configuration Errors ============
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ============ General Errors ============
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BallotError {
    /// True for violations of the ballot's own rules, as opposed to
    /// malformed input or infrastructure failures
    pub fn is_ballot_rule(&self) -> bool {
        matches!(
            self,
            BallotError::InvalidConfiguration(_)
                | BallotError::Unauthorized(_)
                | BallotError::AlreadyVoted(_)
                | BallotError::VotingClosed { .. }
                | BallotError::InvalidProposal { .. }
        )
    }
}

impl From<std::io::Error> for BallotError {
    fn from(err: std::io::Error) -> Self {
        BallotError::ConfigError(err.to_string())
    }
}

impl From<bincode::Error> for BallotError {
    fn from(err: bincode::Error) -> Self {
        BallotError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for BallotError {
    fn from(err: serde_json::Error) -> Self {
        BallotError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_errors() {
        assert!(BallotError::AlreadyVoted(Address::ZERO).is_ballot_rule());
        assert!(BallotError::VotingClosed {
            deadline: Timestamp::from_secs(300),
            now: Timestamp::from_secs(301),
        }
        .is_ballot_rule());
        assert!(!BallotError::InvalidSignature.is_ballot_rule());
        assert!(!BallotError::ConfigError("missing".into()).is_ballot_rule());
    }

    #[test]
    fn test_error_messages() {
        let err = BallotError::InvalidProposal { index: 7, count: 2 };
        assert_eq!(
            err.to_string(),
            "Invalid proposal index 7 (ballot has 2 proposals)"
        );
    }
}
