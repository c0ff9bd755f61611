//! Vote requests and their outcomes.

use voteweb_types::{validate_slug, InputError};

use crate::AdmissionError;

/// Longest accepted resolved identity, in bytes.
pub const MAX_IDENTITY_LEN: usize = 256;

/// One vote submission, addressed by the innovation's (group, slug) key.
#[derive(Clone, Copy, Debug)]
pub struct VoteRequest<'a> {
    pub group_slug: &'a str,
    pub slug: &'a str,
    /// Resolved, normalized client identity (host only).
    pub identity: &'a str,
    pub user_agent: Option<&'a str>,
}

impl<'a> VoteRequest<'a> {
    pub fn new(
        group_slug: &'a str,
        slug: &'a str,
        identity: &'a str,
        user_agent: Option<&'a str>,
    ) -> Self {
        Self {
            group_slug,
            slug,
            identity,
            user_agent,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_slug("group", self.group_slug)?;
        validate_slug("slug", self.slug)?;
        validate_identity(self.identity)
    }
}

pub(crate) fn validate_identity(identity: &str) -> Result<(), InputError> {
    if identity.is_empty() {
        return Err(InputError::Empty { field: "identity" });
    }
    if identity.len() > MAX_IDENTITY_LEN {
        return Err(InputError::TooLong {
            field: "identity",
            max: MAX_IDENTITY_LEN,
        });
    }
    Ok(())
}

/// Outcome of a vote submission.
///
/// `AlreadyVoted` and `NotFound` are ordinary outcomes, not failures.
#[derive(Debug)]
pub enum Decision {
    /// The vote was stored.
    Accepted { vote_count: i64, message: String },
    /// This identity has a vote on record already, for this or any other
    /// innovation. `vote_count` is `Some(0)` on the named and race paths and
    /// `None` when the earlier innovation could not be resolved.
    AlreadyVoted {
        previous: Option<String>,
        message: String,
        vote_count: Option<i64>,
    },
    /// No innovation under the requested (group, slug). Nothing was written.
    NotFound,
    /// Rejected before touching the ledger.
    Invalid(InputError),
    /// Ledger failure or deadline expiry.
    InternalFailure(AdmissionError),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    pub fn is_already_voted(&self) -> bool {
        matches!(self, Decision::AlreadyVoted { .. })
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Accepted { .. } => "accepted",
            Decision::AlreadyVoted { .. } => "already_voted",
            Decision::NotFound => "not_found",
            Decision::Invalid(_) => "invalid",
            Decision::InternalFailure(AdmissionError::Timeout) => "timeout",
            Decision::InternalFailure(_) => "failed",
        }
    }
}
