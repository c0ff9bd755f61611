//! Abstract ledger traits for voteweb.
//!
//! Every storage backend (PostgreSQL, in-memory for testing) implements
//! these traits. The admission engine and the gateway depend only on them.
//!
//! The one load-bearing guarantee a backend must give is that
//! [`VoteStore::insert_vote`] is an atomic conditional insert keyed by the
//! voter's identity token: of any number of concurrent inserts carrying the
//! same token, exactly one reports [`InsertOutcome::Inserted`].

pub mod error;
pub mod innovation;
pub mod vote;

use async_trait::async_trait;

pub use error::StoreError;
pub use innovation::InnovationStore;
pub use vote::{InsertOutcome, VoteStore};

/// A complete ledger: innovation catalog plus vote records.
#[async_trait]
pub trait Ledger: InnovationStore + VoteStore + Send + Sync {
    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
