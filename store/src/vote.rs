//! Vote storage trait.

use async_trait::async_trait;
use voteweb_types::{IdentityToken, Innovation, InnovationId, NewVote, VoteId};

use crate::StoreError;

/// Result of a conditional vote insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(VoteId),
    /// A vote with the same identity token already exists; nothing was written.
    Conflict,
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Whether any vote, for any innovation, carries this token.
    async fn has_voted(&self, token: &IdentityToken) -> Result<bool, StoreError>;

    /// Whether this token voted for one specific innovation.
    async fn has_voted_for(
        &self,
        innovation_id: &InnovationId,
        token: &IdentityToken,
    ) -> Result<bool, StoreError>;

    /// The innovation this token voted for, if any.
    async fn voted_innovation(
        &self,
        token: &IdentityToken,
    ) -> Result<Option<Innovation>, StoreError>;

    /// Insert unless the token is already present. Must be atomic with
    /// respect to concurrent inserts of the same token.
    async fn insert_vote(&self, vote: NewVote) -> Result<InsertOutcome, StoreError>;

    async fn vote_count(&self, innovation_id: &InnovationId) -> Result<i64, StoreError>;

    /// Number of distinct identity tokens that have voted.
    async fn total_voters(&self) -> Result<i64, StoreError>;
}
