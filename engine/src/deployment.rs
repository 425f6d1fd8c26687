//! Deployment descriptor: the one-time provisioning input for a ballot

use ballot_core::{Address, BallotError, BallotId, BallotResult, ProposalLabel, Timestamp};
use ballot_crypto::hashing::hash_multiple;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ballot::Ballot;

/// Deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Human-readable ballot name
    pub name: String,
    /// Chairperson address (hex)
    pub chairperson: String,
    /// Proposal labels, in ballot order
    pub proposals: Vec<String>,
}

impl DeploymentConfig {
    pub fn new(name: &str, chairperson: &Address) -> Self {
        Self {
            name: name.to_string(),
            chairperson: chairperson.to_hex(),
            proposals: vec![],
        }
    }

    /// Add a proposal
    pub fn add_proposal(mut self, label: &str) -> Self {
        self.proposals.push(label.to_string());
        self
    }

    pub fn parse_chairperson(&self) -> BallotResult<Address> {
        Address::from_hex(&self.chairperson)
            .map_err(|e| BallotError::InvalidAddress(e.to_string()))
    }

    /// Encode every label, rejecting any longer than 32 bytes
    pub fn parse_labels(&self) -> BallotResult<Vec<ProposalLabel>> {
        self.proposals
            .iter()
            .map(|text| {
                ProposalLabel::from_text(text).ok_or_else(|| {
                    BallotError::InvalidLabel(format!(
                        "{:?} exceeds {} bytes",
                        text,
                        ProposalLabel::LENGTH
                    ))
                })
            })
            .collect()
    }

    /// Instantiate the ballot at time `now`
    pub fn deploy(&self, now: Timestamp) -> BallotResult<Ballot> {
        let chairperson = self.parse_chairperson()?;
        let labels = self.parse_labels()?;
        let ballot = Ballot::create(labels, chairperson, now)?;

        info!(
            "Deployed ballot {:?} with {} proposals, chairperson {}",
            self.name,
            ballot.proposal_count(),
            chairperson
        );

        Ok(ballot)
    }

    pub fn to_json(&self) -> BallotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BallotError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> BallotResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| BallotError::DeserializationError(e.to_string()))
    }
}

/// Identifier binding chairperson, creation time and proposal list
pub fn compute_ballot_id(ballot: &Ballot) -> BallotId {
    let chairperson = ballot.chairperson();
    let created = ballot.creation_time().as_secs().to_le_bytes();

    let mut parts: Vec<&[u8]> = vec![
        b"BALLOT:".as_slice(),
        chairperson.as_bytes().as_slice(),
        created.as_slice(),
    ];
    for proposal in ballot.proposals() {
        parts.push(proposal.label.as_bytes().as_slice());
    }

    hash_multiple(&parts)
}
