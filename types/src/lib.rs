//! Fundamental types for the voteweb voting service.
//!
//! This crate defines the records shared across every other crate in the
//! workspace: innovations, votes, identity tokens, timestamps, and the
//! input validation rules applied before anything reaches the ledger.

pub mod error;
pub mod innovation;
pub mod time;
pub mod token;
pub mod vote;

pub use error::InputError;
pub use innovation::{validate_slug, Innovation, InnovationId, NewInnovation};
pub use time::Timestamp;
pub use token::IdentityToken;
pub use vote::{NewVote, Vote, VoteId, MAX_USER_AGENT_LEN};
