//! Ballot Engine
//!
//! Implements a single-chairperson, time-boxed ballot with:
//! - Chairperson-granted voting rights
//! - Exactly one vote per enfranchised participant
//! - A fixed voting window measured from creation
//! - Deterministic winner (ties go to the lowest index)

pub mod ballot;
pub mod deployment;
pub mod engine;
pub mod participant;
pub mod proposal;

pub use ballot::*;
pub use deployment::*;
pub use engine::*;
pub use participant::*;
pub use proposal::*;
