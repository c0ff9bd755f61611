//! Nullable ledger — thread-safe in-memory storage for testing.
//!
//! Enforces the same uniqueness rule as the PostgreSQL schema: at most one
//! vote per identity token, checked and written under a single lock.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use voteweb_store::{InnovationStore, InsertOutcome, Ledger, StoreError, VoteStore};
use voteweb_types::{
    IdentityToken, Innovation, InnovationId, NewInnovation, NewVote, Vote, VoteId,
};

use crate::NullClock;

/// Ledger operations that can be made to fail on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailPoint {
    InnovationBySlug,
    ListInnovations,
    UpsertInnovation,
    HasVoted,
    VotedInnovation,
    InsertVote,
    VoteCount,
    TotalVoters,
    Ping,
}

#[derive(Default)]
struct State {
    innovations: Vec<Innovation>,
    votes: HashMap<IdentityToken, Vote>,
    next_vote_id: i64,
    failing: HashSet<FailPoint>,
    blind_existence_check: bool,
    insert_delay: Option<Duration>,
}

/// An in-memory ledger for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullLedger {
    state: Mutex<State>,
    clock: Arc<NullClock>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(NullClock::default()))
    }

    pub fn with_clock(clock: Arc<NullClock>) -> Self {
        Self {
            state: Mutex::new(State {
                next_vote_id: 1,
                ..State::default()
            }),
            clock,
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not poison the ledger for the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.state().failing.contains(&point) {
            return Err(StoreError::Backend(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }

    /// Insert an innovation directly, returning it.
    pub fn add_innovation(&self, group_slug: &str, slug: &str, name: &str) -> Innovation {
        self.upsert(NewInnovation::new(group_slug, slug, name))
    }

    /// Make every call to `point` fail until [`NullLedger::recover`].
    pub fn fail(&self, point: FailPoint) {
        self.state().failing.insert(point);
    }

    pub fn recover(&self, point: FailPoint) {
        self.state().failing.remove(&point);
    }

    /// When set, `has_voted` always answers `false`, as if another request
    /// committed its vote between this request's check and its insert.
    pub fn set_blind_existence_check(&self, blind: bool) {
        self.state().blind_existence_check = blind;
    }

    /// Delay every `insert_vote` by `delay` before it takes effect.
    pub fn set_insert_delay(&self, delay: Option<Duration>) {
        self.state().insert_delay = delay;
    }

    /// Number of stored votes across all innovations.
    pub fn stored_votes(&self) -> usize {
        self.state().votes.len()
    }

    /// Stored votes carrying `token` (0 or 1).
    pub fn votes_for_token(&self, token: &IdentityToken) -> usize {
        usize::from(self.state().votes.contains_key(token))
    }

    /// Drop the innovation row while keeping its votes, leaving orphans.
    pub fn remove_innovation(&self, id: &InnovationId) {
        self.state().innovations.retain(|i| i.id != *id);
    }

    fn upsert(&self, new: NewInnovation) -> Innovation {
        let now = self.clock.now();
        let mut state = self.state();
        if let Some(existing) = state
            .innovations
            .iter_mut()
            .find(|i| i.group_slug == new.group_slug && i.slug == new.slug)
        {
            let mut updated = new.into_innovation(existing.id, existing.created_at);
            updated.updated_at = now;
            *existing = updated.clone();
            return updated;
        }
        let innovation = new.into_innovation(InnovationId::random(), now);
        state.innovations.push(innovation.clone());
        innovation
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InnovationStore for NullLedger {
    async fn innovation_by_slug(
        &self,
        group_slug: &str,
        slug: &str,
    ) -> Result<Option<Innovation>, StoreError> {
        self.check(FailPoint::InnovationBySlug)?;
        Ok(self
            .state()
            .innovations
            .iter()
            .find(|i| i.group_slug == group_slug && i.slug == slug)
            .cloned())
    }

    async fn list_innovations(&self) -> Result<Vec<Innovation>, StoreError> {
        self.check(FailPoint::ListInnovations)?;
        let mut all = self.state().innovations.clone();
        all.sort_by(|a, b| (&a.group_slug, &a.name).cmp(&(&b.group_slug, &b.name)));
        Ok(all)
    }

    async fn upsert_innovation(
        &self,
        innovation: NewInnovation,
    ) -> Result<Innovation, StoreError> {
        self.check(FailPoint::UpsertInnovation)?;
        Ok(self.upsert(innovation))
    }

    async fn innovation_count(&self) -> Result<i64, StoreError> {
        Ok(self.state().innovations.len() as i64)
    }
}

#[async_trait]
impl VoteStore for NullLedger {
    async fn has_voted(&self, token: &IdentityToken) -> Result<bool, StoreError> {
        self.check(FailPoint::HasVoted)?;
        let state = self.state();
        Ok(!state.blind_existence_check && state.votes.contains_key(token))
    }

    async fn has_voted_for(
        &self,
        innovation_id: &InnovationId,
        token: &IdentityToken,
    ) -> Result<bool, StoreError> {
        self.check(FailPoint::HasVoted)?;
        Ok(self
            .state()
            .votes
            .get(token)
            .is_some_and(|v| v.innovation_id == *innovation_id))
    }

    async fn voted_innovation(
        &self,
        token: &IdentityToken,
    ) -> Result<Option<Innovation>, StoreError> {
        self.check(FailPoint::VotedInnovation)?;
        let state = self.state();
        let Some(vote) = state.votes.get(token) else {
            return Ok(None);
        };
        Ok(state
            .innovations
            .iter()
            .find(|i| i.id == vote.innovation_id)
            .cloned())
    }

    async fn insert_vote(&self, vote: NewVote) -> Result<InsertOutcome, StoreError> {
        self.check(FailPoint::InsertVote)?;
        let delay = self.state().insert_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let now = self.clock.now();
        let mut state = self.state();
        if !state.innovations.iter().any(|i| i.id == vote.innovation_id) {
            return Err(StoreError::Constraint(format!(
                "innovation {} does not exist",
                vote.innovation_id
            )));
        }
        if state.votes.contains_key(&vote.voter_token) {
            return Ok(InsertOutcome::Conflict);
        }

        let id = VoteId(state.next_vote_id);
        state.next_vote_id += 1;
        state.votes.insert(
            vote.voter_token,
            Vote {
                id,
                innovation_id: vote.innovation_id,
                voter_token: vote.voter_token,
                user_agent: vote.user_agent,
                created_at: now,
            },
        );
        Ok(InsertOutcome::Inserted(id))
    }

    async fn vote_count(&self, innovation_id: &InnovationId) -> Result<i64, StoreError> {
        self.check(FailPoint::VoteCount)?;
        Ok(self
            .state()
            .votes
            .values()
            .filter(|v| v.innovation_id == *innovation_id)
            .count() as i64)
    }

    async fn total_voters(&self) -> Result<i64, StoreError> {
        self.check(FailPoint::TotalVoters)?;
        Ok(self.state().votes.len() as i64)
    }
}

#[async_trait]
impl Ledger for NullLedger {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check(FailPoint::Ping)
    }
}
