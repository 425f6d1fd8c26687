//! Shared ballot engine
//!
//! Wraps one `Ballot` behind a single lock: mutations take the write lock for
//! their whole check-then-act sequence, queries take the read lock and see a
//! consistent snapshot.

use ballot_core::{
    Address, BallotId, BallotResult, ProposalIndex, ProposalLabel, Timestamp,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::ballot::Ballot;
use crate::deployment::compute_ballot_id;
use crate::participant::Participant;
use crate::proposal::Proposal;

/// Events emitted by the ballot engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BallotEvent {
    /// Chairperson granted a voting right
    RightGranted(Address),
    /// Vote recorded: voter, proposal, new count for that proposal
    VoteCast(Address, ProposalIndex, u64),
    /// Vote attempt refused
    VoteRejected(Address, String),
}

/// Point-in-time view of the whole ballot
#[derive(Debug, Clone, Serialize)]
pub struct BallotSummary {
    pub id: BallotId,
    pub chairperson: Address,
    pub creation_time: Timestamp,
    pub deadline: Timestamp,
    pub open: bool,
    pub proposals: Vec<Proposal>,
    pub winning_proposal: ProposalIndex,
    pub total_votes: u64,
    pub voter_count: usize,
    pub enfranchised_count: usize,
}

/// Ballot engine serializing all access to one ballot
pub struct BallotEngine {
    id: BallotId,
    ballot: RwLock<Ballot>,
    event_tx: Option<mpsc::Sender<BallotEvent>>,
}

impl BallotEngine {
    pub fn new(ballot: Ballot) -> Self {
        let id = compute_ballot_id(&ballot);
        info!(
            "Ballot {} ready: {} proposals, voting closes at {}",
            id,
            ballot.proposal_count(),
            ballot.deadline()
        );

        Self {
            id,
            ballot: RwLock::new(ballot),
            event_tx: None,
        }
    }

    /// Set event channel
    pub fn set_event_channel(&mut self, tx: mpsc::Sender<BallotEvent>) {
        self.event_tx = Some(tx);
    }

    pub fn id(&self) -> BallotId {
        self.id
    }

    pub fn give_right_to_vote(&self, caller: &Address, target: &Address) -> BallotResult<()> {
        let mut ballot = self.ballot.write();

        if let Err(e) = ballot.give_right_to_vote(caller, target) {
            debug!("Grant from {} to {} refused: {}", caller, target, e);
            return Err(e);
        }
        drop(ballot);

        info!("Voting right granted to {}", target);
        self.emit_event(BallotEvent::RightGranted(*target));

        Ok(())
    }

    pub fn vote(&self, caller: &Address, proposal: ProposalIndex, now: Timestamp) -> BallotResult<()> {
        let mut ballot = self.ballot.write();

        if let Err(e) = ballot.vote(caller, proposal, now) {
            drop(ballot);
            debug!("Vote from {} refused: {}", caller, e);
            self.emit_event(BallotEvent::VoteRejected(*caller, e.to_string()));
            return Err(e);
        }
        let count = ballot
            .proposal(proposal)
            .map(|p| p.vote_count)
            .unwrap_or_default();
        drop(ballot);

        info!("Vote cast by {} for proposal {} (now {})", caller, proposal, count);
        self.emit_event(BallotEvent::VoteCast(*caller, proposal, count));

        Ok(())
    }

    pub fn winning_proposal(&self) -> ProposalIndex {
        self.ballot.read().winning_proposal()
    }

    pub fn winner_label(&self) -> ProposalLabel {
        self.ballot.read().winner_label()
    }

    pub fn proposal(&self, index: ProposalIndex) -> Option<Proposal> {
        self.ballot.read().proposal(index).cloned()
    }

    pub fn proposals(&self) -> Vec<Proposal> {
        self.ballot.read().proposals().to_vec()
    }

    pub fn participant(&self, address: &Address) -> Participant {
        self.ballot.read().participant(address)
    }

    pub fn chairperson(&self) -> Address {
        self.ballot.read().chairperson()
    }

    pub fn is_open(&self, now: Timestamp) -> bool {
        self.ballot.read().is_open(now)
    }

    /// Everything a report needs, read under one lock
    pub fn summary(&self, now: Timestamp) -> BallotSummary {
        let ballot = self.ballot.read();
        BallotSummary {
            id: self.id,
            chairperson: ballot.chairperson(),
            creation_time: ballot.creation_time(),
            deadline: ballot.deadline(),
            open: ballot.is_open(now),
            proposals: ballot.proposals().to_vec(),
            winning_proposal: ballot.winning_proposal(),
            total_votes: ballot.total_votes(),
            voter_count: ballot.voter_count(),
            enfranchised_count: ballot.enfranchised_count(),
        }
    }

    fn emit_event(&self, event: BallotEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.try_send(event);
        }
    }
}

/// Shared ballot engine
pub type SharedBallot = Arc<BallotEngine>;

/// Create ballot event channel
pub fn create_ballot_channel() -> (mpsc::Sender<BallotEvent>, mpsc::Receiver<BallotEvent>) {
    mpsc::channel(100)
}
