//! Vote records.

use serde::{Deserialize, Serialize};

use crate::{IdentityToken, InnovationId, Timestamp};

/// User agents longer than this are truncated before storage.
pub const MAX_USER_AGENT_LEN: usize = 512;

/// Ledger-assigned sequence number of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(pub i64);

/// An append-only vote fact. Never mutated or deleted once written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub innovation_id: InnovationId,
    pub voter_token: IdentityToken,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// A vote about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewVote {
    pub innovation_id: InnovationId,
    pub voter_token: IdentityToken,
    pub user_agent: Option<String>,
}

impl NewVote {
    /// Build a vote, dropping an empty user agent and truncating a long one
    /// on a character boundary.
    pub fn new(
        innovation_id: InnovationId,
        voter_token: IdentityToken,
        user_agent: Option<&str>,
    ) -> Self {
        let user_agent = user_agent
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(|ua| truncate_on_char_boundary(ua, MAX_USER_AGENT_LEN).to_string());
        Self {
            innovation_id,
            voter_token,
            user_agent,
        }
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> IdentityToken {
        IdentityToken::new([7u8; 32])
    }

    #[test]
    fn empty_user_agent_is_dropped() {
        let vote = NewVote::new(InnovationId::random(), token(), Some("   "));
        assert_eq!(vote.user_agent, None);
    }

    #[test]
    fn long_user_agent_is_truncated_on_char_boundary() {
        let ua = "é".repeat(MAX_USER_AGENT_LEN);
        let vote = NewVote::new(InnovationId::random(), token(), Some(&ua));
        let stored = vote.user_agent.unwrap();
        assert!(stored.len() <= MAX_USER_AGENT_LEN);
        assert!(stored.chars().all(|c| c == 'é'));
    }
}
