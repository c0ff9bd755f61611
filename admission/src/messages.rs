//! User-facing decision messages.

pub const VOTE_RECORDED: &str = "Vote berhasil dicatat";

/// Already voted, but the earlier innovation could not be looked up.
pub const ALREADY_VOTED_ELSEWHERE: &str =
    "Anda sudah pernah vote untuk inovasi lain. Hanya 1 vote per IP.";

/// Lost the insert race to a concurrent request with the same identity.
pub const VOTE_NOT_PROCESSED: &str = "Vote gagal diproses";

pub fn already_voted_for(name: &str) -> String {
    format!(
        "Anda sudah pernah vote untuk '{}'. Hanya 1 vote per IP yang diizinkan.",
        name
    )
}
