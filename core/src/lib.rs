//! Ballot Core Library
//!
//! Core types, traits, and abstractions shared by the ballot engine and node.
//! This crate provides the foundation for all other ballot components.

pub mod types;
pub mod traits;
pub mod error;
pub mod config;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use config::*;
