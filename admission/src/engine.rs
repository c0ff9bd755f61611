//! The vote admission engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};
use voteweb_crypto::IdentityHasher;
use voteweb_store::{InsertOutcome, Ledger};
use voteweb_types::{validate_slug, Innovation, InnovationId, NewVote};

use crate::decision::validate_identity;
use crate::{messages, AdmissionError, Decision, VoteRequest};

/// Deadline applied by [`AdmissionEngine::submit_vote`].
pub const DEFAULT_ADMISSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Stateless orchestrator over a [`Ledger`].
pub struct AdmissionEngine {
    ledger: Arc<dyn Ledger>,
    hasher: IdentityHasher,
    default_timeout: Duration,
}

impl AdmissionEngine {
    pub fn new(ledger: Arc<dyn Ledger>, hasher: IdentityHasher) -> Self {
        Self {
            ledger,
            hasher,
            default_timeout: DEFAULT_ADMISSION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Submit a vote under the engine's default deadline.
    pub async fn submit_vote(&self, request: &VoteRequest<'_>) -> Decision {
        self.submit_vote_by(request, Instant::now() + self.default_timeout)
            .await
    }

    /// Submit a vote that must finish by `deadline`.
    ///
    /// Produces exactly zero or one new vote. On expiry the in-flight ledger
    /// call is dropped and the result is `InternalFailure(Timeout)`.
    pub async fn submit_vote_by(&self, request: &VoteRequest<'_>, deadline: Instant) -> Decision {
        if let Err(e) = request.validate() {
            debug!(error = %e, "vote request rejected by validation");
            return Decision::Invalid(e);
        }

        match timeout_at(deadline, self.admit(request)).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(e)) => {
                error!(
                    group = request.group_slug,
                    slug = request.slug,
                    error = %e,
                    "vote admission failed"
                );
                Decision::InternalFailure(e)
            }
            Err(_) => {
                warn!(
                    group = request.group_slug,
                    slug = request.slug,
                    "vote admission deadline expired"
                );
                Decision::InternalFailure(AdmissionError::Timeout)
            }
        }
    }

    async fn admit(&self, request: &VoteRequest<'_>) -> Result<Decision, AdmissionError> {
        let token = self.hasher.hash_identity(request.identity);

        let already = self
            .ledger
            .has_voted(&token)
            .await
            .map_err(AdmissionError::storage("has_voted"))?;

        if already {
            return Ok(match self.ledger.voted_innovation(&token).await {
                Ok(Some(previous)) => {
                    info!(
                        group = request.group_slug,
                        slug = request.slug,
                        voter = %token.short(),
                        "duplicate vote attempt"
                    );
                    Decision::AlreadyVoted {
                        message: messages::already_voted_for(&previous.name),
                        previous: Some(previous.name),
                        vote_count: Some(0),
                    }
                }
                lookup => {
                    match lookup {
                        Err(e) => error!(voter = %token.short(), error = %e, "failed to load previously voted innovation"),
                        Ok(_) => warn!(voter = %token.short(), "vote on record for an unknown innovation"),
                    }
                    Decision::AlreadyVoted {
                        previous: None,
                        message: messages::ALREADY_VOTED_ELSEWHERE.to_string(),
                        vote_count: None,
                    }
                }
            });
        }

        let Some(innovation) = self
            .ledger
            .innovation_by_slug(request.group_slug, request.slug)
            .await
            .map_err(AdmissionError::storage("innovation_by_slug"))?
        else {
            info!(
                group = request.group_slug,
                slug = request.slug,
                "vote for unknown innovation"
            );
            return Ok(Decision::NotFound);
        };

        let vote = NewVote::new(innovation.id, token, request.user_agent);
        let outcome = self
            .ledger
            .insert_vote(vote)
            .await
            .map_err(AdmissionError::storage("insert_vote"))?;

        let vote_id = match outcome {
            InsertOutcome::Inserted(id) => id,
            InsertOutcome::Conflict => {
                info!(
                    innovation = %innovation.id,
                    voter = %token.short(),
                    "lost insert race to a concurrent vote"
                );
                return Ok(Decision::AlreadyVoted {
                    previous: None,
                    message: messages::VOTE_NOT_PROCESSED.to_string(),
                    vote_count: Some(0),
                });
            }
        };

        let vote_count = self
            .ledger
            .vote_count(&innovation.id)
            .await
            .map_err(AdmissionError::storage("vote_count"))?;

        info!(
            innovation = %innovation.id,
            group = request.group_slug,
            slug = request.slug,
            vote_id = vote_id.0,
            vote_count,
            "vote recorded"
        );

        Ok(Decision::Accepted {
            vote_count,
            message: messages::VOTE_RECORDED.to_string(),
        })
    }

    // ── Read-only pass-throughs ─────────────────────────────────────────

    /// Look up an innovation for display. Keys that could never be stored
    /// resolve to `None` without a ledger round trip.
    pub async fn get_innovation(
        &self,
        group_slug: &str,
        slug: &str,
    ) -> Result<Option<Innovation>, AdmissionError> {
        if validate_slug("group", group_slug).is_err() || validate_slug("slug", slug).is_err() {
            return Ok(None);
        }
        self.ledger
            .innovation_by_slug(group_slug, slug)
            .await
            .map_err(AdmissionError::storage("innovation_by_slug"))
    }

    pub async fn get_vote_count(&self, innovation_id: &InnovationId) -> Result<i64, AdmissionError> {
        self.ledger
            .vote_count(innovation_id)
            .await
            .map_err(AdmissionError::storage("vote_count"))
    }

    pub async fn list_innovations(&self) -> Result<Vec<Innovation>, AdmissionError> {
        self.ledger
            .list_innovations()
            .await
            .map_err(AdmissionError::storage("list_innovations"))
    }

    /// Whether `identity` has voted anywhere. Voting is one per identity
    /// across the whole catalog, so `innovation_id` only scopes the log line.
    pub async fn check_has_voted(
        &self,
        innovation_id: &InnovationId,
        identity: &str,
    ) -> Result<bool, AdmissionError> {
        validate_identity(identity)?;
        let token = self.hasher.hash_identity(identity);
        let voted = self
            .ledger
            .has_voted(&token)
            .await
            .map_err(AdmissionError::storage("has_voted"))?;
        debug!(innovation = %innovation_id, voter = %token.short(), voted, "vote status checked");
        Ok(voted)
    }

    /// Number of distinct identities that have voted.
    pub async fn get_total_voters(&self) -> Result<i64, AdmissionError> {
        self.ledger
            .total_voters()
            .await
            .map_err(AdmissionError::storage("total_voters"))
    }
}
