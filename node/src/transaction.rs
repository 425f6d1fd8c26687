//! Signed ballot transactions
//!
//! A transaction is how an outside caller proves its identity to the node.
//! Once the signature checks out, only the sender address travels on to the
//! engine.

use ballot_core::{
    Address, BallotError, BallotId, BallotResult, Hash, Hashable, ProposalIndex, PublicKey,
    Signable, Signature, TxId,
};
use ballot_crypto::hashing::hash;
use ballot_crypto::keys::{verify_address, KeyPair};
use ballot_crypto::signing::{sign, verify};
use serde::{Deserialize, Serialize};

/// Operation requested by the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotAction {
    /// Chairperson enfranchises `target`
    GrantRight { target: Address },
    /// Sender casts its vote
    Vote { proposal: ProposalIndex },
}

impl BallotAction {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            BallotAction::GrantRight { target } => {
                out.push(0);
                out.extend_from_slice(target.as_bytes());
            }
            BallotAction::Vote { proposal } => {
                out.push(1);
                out.extend_from_slice(&proposal.to_le_bytes());
            }
        }
    }
}

/// Ballot transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotTransaction {
    /// Ballot this transaction is bound to
    pub ballot_id: BallotId,
    /// Sender address
    pub sender: Address,
    pub action: BallotAction,
    /// Sender's public key
    pub public_key: PublicKey,
    /// Signature over ballot, sender and action
    pub signature: Signature,
}

impl BallotTransaction {
    /// Create and sign a new transaction
    pub fn new(ballot_id: BallotId, action: BallotAction, keypair: &KeyPair) -> Self {
        let sender = keypair.address();
        let signing_bytes = Self::compute_signing_bytes(&ballot_id, &sender, &action);
        let signature = sign(keypair, &signing_bytes);

        Self {
            ballot_id,
            sender,
            action,
            public_key: keypair.public_key(),
            signature,
        }
    }

    fn compute_signing_bytes(ballot_id: &BallotId, sender: &Address, action: &BallotAction) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(112);
        bytes.extend_from_slice(b"BALLOT_TX:");
        bytes.extend_from_slice(ballot_id.as_bytes());
        bytes.extend_from_slice(sender.as_bytes());
        action.encode(&mut bytes);
        bytes
    }

    /// Verify the sender owns the key and the key signed this transaction
    pub fn verify_signature(&self) -> BallotResult<()> {
        if !verify_address(&self.sender, &self.public_key) {
            return Err(BallotError::InvalidAddress(
                "Address does not match public key".into(),
            ));
        }

        verify(&self.public_key, &self.signing_bytes(), &self.signature)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> BallotResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> BallotResult<Self> {
        bincode::deserialize(bytes).map_err(|e| BallotError::DeserializationError(e.to_string()))
    }
}

impl Hashable for BallotTransaction {
    fn hash(&self) -> Hash {
        let mut bytes = self.signing_bytes();
        bytes.extend_from_slice(self.signature.as_bytes());
        hash(&bytes)
    }
}

impl Signable for BallotTransaction {
    fn signing_bytes(&self) -> Vec<u8> {
        Self::compute_signing_bytes(&self.ballot_id, &self.sender, &self.action)
    }
}

/// Transaction whose signature has been checked
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    pub tx: BallotTransaction,
    pub tx_id: TxId,
}

impl VerifiedTransaction {
    pub fn new(tx: BallotTransaction) -> BallotResult<Self> {
        tx.verify_signature()?;
        let tx_id = tx.hash();
        Ok(Self { tx, tx_id })
    }

    /// Authenticated caller identity
    pub fn caller(&self) -> Address {
        self.tx.sender
    }
}
