//! Participant records

use ballot_core::ProposalIndex;
use serde::{Deserialize, Serialize};

/// Voting rights and vote state of one participant.
///
/// The default value is what an unseen participant looks like: no right,
/// no vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Granted voting rights by the chairperson
    pub has_right: bool,
    /// Already cast a vote; never reset
    pub has_voted: bool,
    /// Proposal voted for, set together with `has_voted`
    pub voted_proposal: Option<ProposalIndex>,
}

impl Participant {
    pub(crate) fn grant(&mut self) {
        self.has_right = true;
    }

    pub(crate) fn record_vote(&mut self, proposal: ProposalIndex) {
        debug_assert!(self.has_right && !self.has_voted);
        self.has_voted = true;
        self.voted_proposal = Some(proposal);
    }

    pub fn state(&self) -> ParticipantState {
        match (self.has_right, self.voted_proposal) {
            (_, Some(index)) if self.has_voted => ParticipantState::Voted(index),
            (true, _) => ParticipantState::HasRight,
            _ => ParticipantState::NoRight,
        }
    }
}

/// Per-participant lifecycle: `NoRight -> HasRight -> Voted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "proposal", rename_all = "snake_case")]
pub enum ParticipantState {
    NoRight,
    HasRight,
    /// Terminal
    Voted(ProposalIndex),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut p = Participant::default();
        assert_eq!(p.state(), ParticipantState::NoRight);

        p.grant();
        assert_eq!(p.state(), ParticipantState::HasRight);

        // Granting twice changes nothing
        p.grant();
        assert_eq!(p.state(), ParticipantState::HasRight);

        p.record_vote(2);
        assert_eq!(p.state(), ParticipantState::Voted(2));
        assert!(p.has_right);
    }
}
