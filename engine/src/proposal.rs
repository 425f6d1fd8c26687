//! Proposal records

use ballot_core::ProposalLabel;
use serde::{Deserialize, Serialize};

/// One entry in the ballot; its position in the ballot is its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub label: ProposalLabel,
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(label: ProposalLabel) -> Self {
        Self {
            label,
            vote_count: 0,
        }
    }

    pub(crate) fn add_vote(&mut self) {
        self.vote_count += 1;
    }
}

/// Index of the first proposal holding the highest count.
///
/// A later proposal only takes over on a strictly greater count, so ties go
/// to the lowest index and an all-zero tally yields 0.
pub fn winning_index(proposals: &[Proposal]) -> usize {
    let mut winner = 0;
    let mut best = 0u64;

    for (index, proposal) in proposals.iter().enumerate() {
        if proposal.vote_count > best {
            best = proposal.vote_count;
            winner = index;
        }
    }

    winner
}
