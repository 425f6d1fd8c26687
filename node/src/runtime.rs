//! Node runtime: one ballot, one clock, authenticated intake

use ballot_core::{
    Address, BallotError, BallotId, BallotResult, Clock, NodeConfig, ProposalIndex,
    ProposalLabel, Timestamp, TxId,
};
use ballot_crypto::keys::KeyPair;
use ballot_engine::{
    BallotEngine, BallotSummary, DeploymentConfig, Participant, Proposal, SharedBallot,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::transaction::{BallotAction, VerifiedTransaction};

/// Node runtime hosting a single ballot
pub struct NodeRuntime {
    config: NodeConfig,
    keypair: KeyPair,
    clock: Arc<dyn Clock>,
    deployment: DeploymentConfig,
    ballot: SharedBallot,
}

impl NodeRuntime {
    /// Deploy the ballot described by `deployment`, stamped with the clock's
    /// current time
    pub fn new(
        config: NodeConfig,
        keypair: KeyPair,
        deployment: DeploymentConfig,
        clock: Arc<dyn Clock>,
    ) -> BallotResult<Self> {
        let ballot = deployment.deploy(clock.now())?;
        let ballot = Arc::new(BallotEngine::new(ballot));

        Ok(Self {
            config,
            keypair,
            clock,
            deployment,
            ballot,
        })
    }

    /// Apply a verified transaction on behalf of its sender
    pub fn submit_transaction(&self, tx: &VerifiedTransaction) -> BallotResult<TxId> {
        let expected = self.ballot.id();
        if tx.tx.ballot_id != expected {
            return Err(BallotError::WrongBallot {
                expected,
                got: tx.tx.ballot_id,
            });
        }

        let caller = tx.caller();
        let result = match tx.tx.action {
            BallotAction::GrantRight { target } => self.ballot.give_right_to_vote(&caller, &target),
            BallotAction::Vote { proposal } => self.ballot.vote(&caller, proposal, self.clock.now()),
        };

        match result {
            Ok(()) => {
                info!("Transaction {} applied", tx.tx_id);
                Ok(tx.tx_id)
            }
            Err(e) => {
                warn!("Transaction {} rejected: {}", tx.tx_id, e);
                Err(e)
            }
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn ballot_id(&self) -> BallotId {
        self.ballot.id()
    }

    pub fn ballot_name(&self) -> &str {
        &self.deployment.name
    }

    pub fn summary(&self) -> BallotSummary {
        self.ballot.summary(self.clock.now())
    }

    pub fn proposals(&self) -> Vec<Proposal> {
        self.ballot.proposals()
    }

    pub fn proposal(&self, index: ProposalIndex) -> Option<Proposal> {
        self.ballot.proposal(index)
    }

    pub fn participant(&self, address: &Address) -> Participant {
        self.ballot.participant(address)
    }

    pub fn winner(&self) -> (ProposalIndex, ProposalLabel) {
        let summary = self.ballot.summary(self.clock.now());
        let index = summary.winning_proposal;
        (index, summary.proposals[index as usize].label)
    }

    /// Node identity (not a ballot role)
    pub fn node_address(&self) -> Address {
        self.keypair.address()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Get ballot reference
    pub fn ballot(&self) -> &SharedBallot {
        &self.ballot
    }
}
