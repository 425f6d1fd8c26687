//! The ballot state machine
//!
//! A `Ballot` is a plain value: every operation takes the caller identity and,
//! where time matters, the current time as explicit arguments. Each operation
//! runs all of its checks before touching any state, so a failed call leaves
//! the ballot exactly as it was.

use ballot_core::{
    Address, BallotError, BallotResult, ProposalIndex, ProposalLabel, Timestamp,
    VOTING_WINDOW_SECONDS,
};
use std::collections::HashMap;

use crate::participant::{Participant, ParticipantState};
use crate::proposal::{winning_index, Proposal};

/// One voting round
#[derive(Debug, Clone)]
pub struct Ballot {
    chairperson: Address,
    creation_time: Timestamp,
    proposals: Vec<Proposal>,
    participants: HashMap<Address, Participant>,
}

impl Ballot {
    /// Create a ballot. `creator` becomes the chairperson; nobody holds a
    /// voting right yet, the chairperson included.
    pub fn create(
        labels: Vec<ProposalLabel>,
        creator: Address,
        now: Timestamp,
    ) -> BallotResult<Self> {
        if labels.is_empty() {
            return Err(BallotError::InvalidConfiguration(
                "a ballot needs at least one proposal".into(),
            ));
        }
        if ProposalIndex::try_from(labels.len()).is_err() {
            return Err(BallotError::InvalidConfiguration(format!(
                "too many proposals: {}",
                labels.len()
            )));
        }

        Ok(Self {
            chairperson: creator,
            creation_time: now,
            proposals: labels.into_iter().map(Proposal::new).collect(),
            participants: HashMap::new(),
        })
    }

    /// Grant `target` the right to vote. Only the chairperson may call this.
    /// Granting an existing right is a no-op; granting to someone who already
    /// voted is rejected. Not gated by the voting window.
    pub fn give_right_to_vote(&mut self, caller: &Address, target: &Address) -> BallotResult<()> {
        if caller != &self.chairperson {
            return Err(BallotError::Unauthorized(
                "only the chairperson can give right to vote".into(),
            ));
        }
        if self.participant(target).has_voted {
            return Err(BallotError::AlreadyVoted(*target));
        }

        self.participants.entry(*target).or_default().grant();
        Ok(())
    }

    /// Cast `caller`'s single vote for `proposal` at time `now`.
    ///
    /// Once the window has closed every attempt fails with `VotingClosed`,
    /// whatever the caller's rights or vote state.
    pub fn vote(
        &mut self,
        caller: &Address,
        proposal: ProposalIndex,
        now: Timestamp,
    ) -> BallotResult<()> {
        if !self.is_open(now) {
            return Err(BallotError::VotingClosed {
                deadline: self.deadline(),
                now,
            });
        }
        let record = self.participant(caller);
        if !record.has_right {
            return Err(BallotError::Unauthorized("has no right to vote".into()));
        }
        if record.has_voted {
            return Err(BallotError::AlreadyVoted(*caller));
        }
        let slot = proposal as usize;
        if slot >= self.proposals.len() {
            return Err(BallotError::InvalidProposal {
                index: proposal,
                count: self.proposals.len(),
            });
        }

        self.participants
            .entry(*caller)
            .or_default()
            .record_vote(proposal);
        self.proposals[slot].add_vote();
        Ok(())
    }

    /// Index of the proposal with the most votes; ties go to the lowest index
    pub fn winning_proposal(&self) -> ProposalIndex {
        // create() caps the proposal count at ProposalIndex::MAX
        winning_index(&self.proposals) as ProposalIndex
    }

    pub fn winner_label(&self) -> ProposalLabel {
        self.proposals[winning_index(&self.proposals)].label
    }

    /// Last second at which a vote is still accepted
    pub fn deadline(&self) -> Timestamp {
        self.creation_time.plus_secs(VOTING_WINDOW_SECONDS)
    }

    /// Whether a vote at `now` falls inside the window (deadline inclusive)
    pub fn is_open(&self, now: Timestamp) -> bool {
        now <= self.deadline()
    }

    pub fn chairperson(&self) -> Address {
        self.chairperson
    }

    pub fn creation_time(&self) -> Timestamp {
        self.creation_time
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn proposal(&self, index: ProposalIndex) -> Option<&Proposal> {
        self.proposals.get(index as usize)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Record for `address`; unseen participants get the default record
    pub fn participant(&self, address: &Address) -> Participant {
        self.participants.get(address).copied().unwrap_or_default()
    }

    pub fn participant_state(&self, address: &Address) -> ParticipantState {
        self.participant(address).state()
    }

    pub fn has_right(&self, address: &Address) -> bool {
        self.participant(address).has_right
    }

    pub fn has_voted(&self, address: &Address) -> bool {
        self.participant(address).has_voted
    }

    /// Sum of all proposal counts
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }

    /// Number of participants that have voted
    pub fn voter_count(&self) -> usize {
        self.participants.values().filter(|p| p.has_voted).count()
    }

    /// Number of participants holding a voting right
    pub fn enfranchised_count(&self) -> usize {
        self.participants.values().filter(|p| p.has_right).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u64 = 1_700_000_000;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 32])
    }

    fn labels(names: &[&str]) -> Vec<ProposalLabel> {
        names
            .iter()
            .map(|n| ProposalLabel::from_text(n).unwrap())
            .collect()
    }

    fn at(offset: u64) -> Timestamp {
        Timestamp::from_secs(START + offset)
    }

    fn setup() -> (Ballot, Address) {
        let chair = addr(0);
        let ballot = Ballot::create(labels(&["ETH", "BTC"]), chair, at(0)).unwrap();
        (ballot, chair)
    }

    #[test]
    fn test_create() {
        let (ballot, chair) = setup();

        assert_eq!(ballot.chairperson(), chair);
        assert_eq!(ballot.creation_time(), at(0));
        assert_eq!(ballot.proposal_count(), 2);
        assert_eq!(ballot.proposal(1).unwrap().label.to_string(), "BTC");
        assert!(ballot.proposals().iter().all(|p| p.vote_count == 0));
        // The chairperson has no right by default
        assert!(!ballot.has_right(&chair));
        assert_eq!(ballot.deadline(), at(300));
    }

    #[test]
    fn test_create_without_proposals() {
        let result = Ballot::create(vec![], addr(0), at(0));
        assert!(matches!(result, Err(BallotError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_unseen_participant_defaults() {
        let (ballot, _) = setup();
        let p = ballot.participant(&addr(9));
        assert!(!p.has_right);
        assert!(!p.has_voted);
        assert_eq!(p.voted_proposal, None);
        assert_eq!(ballot.participant_state(&addr(9)), ParticipantState::NoRight);
    }

    #[test]
    fn test_grant_requires_chairperson() {
        let (mut ballot, _) = setup();

        let result = ballot.give_right_to_vote(&addr(1), &addr(2));
        assert!(matches!(result, Err(BallotError::Unauthorized(_))));
        assert!(!ballot.has_right(&addr(2)));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let (mut ballot, chair) = setup();

        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        assert!(ballot.has_right(&addr(1)));
        assert_eq!(ballot.enfranchised_count(), 1);
    }

    #[test]
    fn test_grant_after_vote_rejected() {
        let (mut ballot, chair) = setup();

        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        ballot.vote(&addr(1), 0, at(10)).unwrap();

        let result = ballot.give_right_to_vote(&chair, &addr(1));
        assert!(matches!(result, Err(BallotError::AlreadyVoted(a)) if a == addr(1)));
        assert_eq!(ballot.participant_state(&addr(1)), ParticipantState::Voted(0));
    }

    #[test]
    fn test_grant_after_window_closes() {
        let (mut ballot, chair) = setup();

        // Granting is not gated by time, but the late vote is
        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        let result = ballot.vote(&addr(1), 0, at(1_000));
        assert!(matches!(result, Err(BallotError::VotingClosed { .. })));
    }

    #[test]
    fn test_chairperson_can_enfranchise_self() {
        let (mut ballot, chair) = setup();

        assert!(matches!(
            ballot.vote(&chair, 0, at(1)),
            Err(BallotError::Unauthorized(_))
        ));
        ballot.give_right_to_vote(&chair, &chair).unwrap();
        ballot.vote(&chair, 0, at(1)).unwrap();
        assert_eq!(ballot.proposal(0).unwrap().vote_count, 1);
    }

    #[test]
    fn test_eth_btc_scenario() {
        let (mut ballot, chair) = setup();
        let voter1 = addr(1);

        let result = ballot.vote(&voter1, 0, at(1));
        assert!(matches!(result, Err(BallotError::Unauthorized(_))));

        ballot.give_right_to_vote(&chair, &voter1).unwrap();
        ballot.vote(&voter1, 1, at(2)).unwrap();

        assert_eq!(ballot.winning_proposal(), 1);
        assert_eq!(ballot.winner_label().to_string(), "BTC");
    }

    #[test]
    fn test_double_vote_rejected() {
        let (mut ballot, chair) = setup();

        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        ballot.vote(&addr(1), 0, at(5)).unwrap();

        let result = ballot.vote(&addr(1), 1, at(6));
        assert!(matches!(result, Err(BallotError::AlreadyVoted(_))));
        assert_eq!(ballot.proposal(0).unwrap().vote_count, 1);
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 0);
        assert_eq!(ballot.participant(&addr(1)).voted_proposal, Some(0));
    }

    #[test]
    fn test_window_boundaries() {
        let (mut ballot, chair) = setup();
        for n in 1..=4 {
            ballot.give_right_to_vote(&chair, &addr(n)).unwrap();
        }

        ballot.vote(&addr(1), 1, at(0)).unwrap();
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 1);

        ballot.vote(&addr(2), 1, at(299)).unwrap();
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 2);

        ballot.vote(&addr(3), 1, at(300)).unwrap();
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 3);

        let result = ballot.vote(&addr(4), 1, at(301));
        assert!(matches!(
            result,
            Err(BallotError::VotingClosed { deadline, now })
                if deadline == at(300) && now == at(301)
        ));
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 3);
        assert!(!ballot.has_voted(&addr(4)));
    }

    #[test]
    fn test_closed_window_regardless_of_rights() {
        let (mut ballot, chair) = setup();
        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();
        ballot.vote(&addr(1), 0, at(300)).unwrap();

        // Never enfranchised
        assert!(matches!(
            ballot.vote(&addr(2), 0, at(301)),
            Err(BallotError::VotingClosed { .. })
        ));
        // Already voted
        assert!(matches!(
            ballot.vote(&addr(1), 0, at(301)),
            Err(BallotError::VotingClosed { .. })
        ));
        assert_eq!(ballot.total_votes(), 1);
    }

    #[test]
    fn test_closed_window_beats_range_check() {
        let (mut ballot, chair) = setup();
        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();

        let result = ballot.vote(&addr(1), 99, at(301));
        assert!(matches!(result, Err(BallotError::VotingClosed { .. })));
    }

    #[test]
    fn test_invalid_proposal_leaves_state_unchanged() {
        let (mut ballot, chair) = setup();
        ballot.give_right_to_vote(&chair, &addr(1)).unwrap();

        let result = ballot.vote(&addr(1), 2, at(1));
        assert!(matches!(
            result,
            Err(BallotError::InvalidProposal { index: 2, count: 2 })
        ));
        assert!(!ballot.has_voted(&addr(1)));
        assert_eq!(ballot.total_votes(), 0);

        // The right is still usable
        ballot.vote(&addr(1), 1, at(2)).unwrap();
        assert_eq!(ballot.total_votes(), 1);
    }

    #[test]
    fn test_tally_matches_voters() {
        let chair = addr(0);
        let mut ballot = Ballot::create(labels(&["A", "B", "C"]), chair, at(0)).unwrap();

        for n in 1..=10u8 {
            ballot.give_right_to_vote(&chair, &addr(n)).unwrap();
        }
        for n in 1..=10u8 {
            let _ = ballot.vote(&addr(n), (n % 4) as ProposalIndex, at(n as u64));
            // Only counts when the first attempt was out of range
            let _ = ballot.vote(&addr(n), 0, at(n as u64));
        }

        assert_eq!(ballot.total_votes(), ballot.voter_count() as u64);
        assert_eq!(ballot.voter_count(), 10);
        // Voters 4 and 8 chose 0 outright; 3 and 7 fell back to it
        assert_eq!(ballot.proposal(0).unwrap().vote_count, 4);
    }

    #[test]
    fn test_tie_resolves_to_lowest_index() {
        let chair = addr(0);
        let mut ballot = Ballot::create(labels(&["A", "B", "C"]), chair, at(0)).unwrap();

        let plan: [(u8, ProposalIndex); 7] = [(1, 0), (2, 1), (3, 0), (4, 1), (5, 2), (6, 0), (7, 1)];
        for (n, choice) in plan {
            ballot.give_right_to_vote(&chair, &addr(n)).unwrap();
            ballot.vote(&addr(n), choice, at(n as u64)).unwrap();
        }

        assert_eq!(ballot.proposal(0).unwrap().vote_count, 3);
        assert_eq!(ballot.proposal(1).unwrap().vote_count, 3);
        assert_eq!(ballot.proposal(2).unwrap().vote_count, 1);
        assert_eq!(ballot.winning_proposal(), 0);
        assert_eq!(ballot.winner_label().to_string(), "A");
    }

    #[test]
    fn test_winner_without_votes() {
        let (ballot, _) = setup();
        assert_eq!(ballot.winning_proposal(), 0);
        assert_eq!(ballot.winner_label().to_string(), "ETH");
    }
}
