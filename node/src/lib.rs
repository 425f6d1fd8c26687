//! Ballot Node Implementation
//!
//! Hosts one ballot and combines:
//! - Signed transaction intake (caller authentication)
//! - Clock (supplies `now` to the engine)
//! - HTTP API

mod api;
mod clock;
mod node;
mod runtime;
mod transaction;

pub use api::*;
pub use clock::*;
pub use node::*;
pub use runtime::*;
pub use transaction::*;
