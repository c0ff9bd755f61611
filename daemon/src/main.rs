//! voteweb daemon: serve the voting API, seed the catalog, or migrate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use voteweb_server::{init_logging, Secret, ServerConfig, ShutdownController};

#[derive(Parser)]
#[command(name = "voteweb-daemon", about = "Public innovation voting service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and environment variables override them.
    #[arg(long, env = "VOTEWEB_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    #[arg(long, env = "PORT")]
    port: Option<u16>,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "MAX_DB_CONNECTIONS")]
    max_db_connections: Option<u32>,

    /// Identity hash secret. Required.
    #[arg(long, env = "IP_HASH_SALT", hide_env_values = true)]
    ip_hash_salt: Option<String>,

    #[arg(long, env = "TRUST_PROXY")]
    trust_proxy: Option<bool>,

    /// Comma-separated CIDRs whose X-Forwarded-For is honoured.
    #[arg(long, env = "ALLOWED_PROXY_CIDRS")]
    allowed_proxy_cidrs: Option<String>,

    /// Admin API secret. Empty disables the admin routes.
    #[arg(long, env = "ADMIN_CODE", hide_env_values = true)]
    admin_code: Option<String>,

    #[arg(long, env = "AUTO_VOTE_ON_VIEW")]
    auto_vote_on_view: Option<bool>,

    #[arg(long, env = "VOTING_OPEN")]
    voting_open: Option<bool>,

    /// Per-request admission deadline in milliseconds.
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    request_timeout_ms: Option<u64>,

    #[arg(long, env = "SECURE_COOKIES")]
    secure_cookies: Option<bool>,

    /// "human" or "json".
    #[arg(long, env = "LOG_FORMAT")]
    log_format: Option<String>,

    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long, env = "SEED_ON_START")]
    seed_on_start: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Upsert the built-in innovation catalog.
    Seed,
    /// Apply database migrations.
    Migrate,
}

impl Cli {
    /// Overlay flags and environment variables on the file (or default) config.
    fn into_config(self) -> anyhow::Result<(ServerConfig, Command)> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(v) = self.listen_addr {
            config.listen_addr = v;
        }
        if let Some(v) = self.port {
            config.port = v;
        }
        if let Some(v) = self.database_url {
            config.database_url = v;
        }
        if let Some(v) = self.max_db_connections {
            config.max_db_connections = v;
        }
        if let Some(v) = self.ip_hash_salt {
            config.ip_hash_salt = Secret::new(v);
        }
        if let Some(v) = self.trust_proxy {
            config.trust_proxy = v;
        }
        if let Some(v) = self.allowed_proxy_cidrs {
            config.allowed_proxy_cidrs = v;
        }
        if let Some(v) = self.admin_code {
            config.admin_code = Secret::new(v);
        }
        if let Some(v) = self.auto_vote_on_view {
            config.auto_vote_on_view = v;
        }
        if let Some(v) = self.voting_open {
            config.voting_open = v;
        }
        if let Some(v) = self.request_timeout_ms {
            config.request_timeout_ms = v;
        }
        if let Some(v) = self.secure_cookies {
            config.secure_cookies = v;
        }
        if let Some(v) = self.log_format {
            config.log_format = v;
        }
        if let Some(v) = self.log_level {
            config.log_level = v;
        }
        if let Some(v) = self.seed_on_start {
            config.seed_on_start = v;
        }

        Ok((config, self.command))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, command) = Cli::parse().into_config()?;
    init_logging(config.parsed_log_format()?, &config.log_level)?;

    match command {
        Command::Serve => {
            let shutdown = Arc::new(ShutdownController::new());
            let listener = Arc::clone(&shutdown);
            tokio::spawn(async move { listener.wait_for_signal().await });

            voteweb_server::serve(&config, &shutdown)
                .await
                .context("server failed")?;
            tracing::info!("voteweb daemon exited cleanly");
        }
        Command::Seed => {
            let seeded = voteweb_server::run_seed(&config).await.context("seeding failed")?;
            tracing::info!(seeded, "catalog seeded");
        }
        Command::Migrate => {
            let version = voteweb_server::run_migrations(&config)
                .await
                .context("migration failed")?;
            tracing::info!(schema_version = version, "migrations applied");
        }
    }

    Ok(())
}
