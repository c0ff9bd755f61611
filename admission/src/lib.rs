//! Vote admission engine for voteweb.
//!
//! Turns a vote request into a [`Decision`]. The engine holds no state of
//! its own; it hashes the client identity and orchestrates single-statement
//! ledger operations. Correctness under concurrency comes from two layers:
//!
//! 1. An optimistic existence check, which answers the common repeat-voter
//!    case cheaply and with the name of the earlier choice.
//! 2. The ledger's conditional insert, keyed by the identity token, which is
//!    the only authority. A request that passes the check but loses the
//!    insert race still ends as `AlreadyVoted`.
//!
//! No in-process lock is taken; several engine processes may share one
//! ledger.

pub mod decision;
pub mod engine;
pub mod error;
pub mod messages;

pub use decision::{Decision, VoteRequest, MAX_IDENTITY_LEN};
pub use engine::{AdmissionEngine, DEFAULT_ADMISSION_TIMEOUT};
pub use error::AdmissionError;
