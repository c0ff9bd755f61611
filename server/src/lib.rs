//! Process-level plumbing for voteweb: configuration, logging, the seed
//! catalog, and the wiring that turns a [`ServerConfig`] into a running
//! HTTP server.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod seed;
pub mod shutdown;

pub use app::{build_state, open_ledger, require_healthy, run_migrations, run_seed, serve};
pub use config::{Secret, ServerConfig};
pub use error::ServerError;
pub use logging::{init_logging, LogFormat};
pub use seed::{seed_catalog, seed_innovations, SEED_INNOVATIONS};
pub use shutdown::ShutdownController;
