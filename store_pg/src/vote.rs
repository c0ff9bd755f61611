//! PostgreSQL implementation of VoteStore.

use async_trait::async_trait;
use voteweb_store::{InsertOutcome, StoreError, VoteStore};
use voteweb_types::{IdentityToken, Innovation, InnovationId, NewVote, VoteId};

use crate::row::{select_innovation, InnovationRow};
use crate::{PgError, PgLedger};

#[async_trait]
impl VoteStore for PgLedger {
    async fn has_voted(&self, token: &IdentityToken) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM votes WHERE voter_identity_token = $1)",
        )
        .bind(token.as_bytes().as_slice())
        .fetch_one(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(exists)
    }

    async fn has_voted_for(
        &self,
        innovation_id: &InnovationId,
        token: &IdentityToken,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM votes WHERE innovation_id = $1 AND voter_identity_token = $2)",
        )
        .bind(innovation_id.as_uuid())
        .bind(token.as_bytes().as_slice())
        .fetch_one(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(exists)
    }

    async fn voted_innovation(
        &self,
        token: &IdentityToken,
    ) -> Result<Option<Innovation>, StoreError> {
        let row = sqlx::query_as::<_, InnovationRow>(select_innovation!(
            "FROM innovations WHERE id = (SELECT innovation_id FROM votes WHERE voter_identity_token = $1)"
        ))
        .bind(token.as_bytes().as_slice())
        .fetch_optional(self.pool())
        .await
        .map_err(PgError::from)?;
        Ok(row.map(Innovation::from))
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<InsertOutcome, StoreError> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO votes (innovation_id, voter_identity_token, user_agent) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (voter_identity_token) DO NOTHING \
             RETURNING id",
        )
        .bind(vote.innovation_id.as_uuid())
        .bind(vote.voter_token.as_bytes().as_slice())
        .bind(vote.user_agent.as_deref())
        .fetch_optional(self.pool())
        .await
        .map_err(PgError::from)?;

        Ok(match id {
            Some(id) => InsertOutcome::Inserted(VoteId(id)),
            None => InsertOutcome::Conflict,
        })
    }

    async fn vote_count(&self, innovation_id: &InnovationId) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE innovation_id = $1")
            .bind(innovation_id.as_uuid())
            .fetch_one(self.pool())
            .await
            .map_err(PgError::from)?;
        Ok(count)
    }

    async fn total_voters(&self) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT voter_identity_token) FROM votes")
                .fetch_one(self.pool())
                .await
                .map_err(PgError::from)?;
        Ok(count)
    }
}
