//! jobfit server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `JOBFIT_*` environment variables, opens the SQLite store, and serves the
//! matching API over HTTP.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `JOBFIT_EMBEDDER__KIND=http`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use jobfit_server::ServerConfig;
use jobfit_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "jobfit matching server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Rescore every candidate against every job, then exit.
  #[arg(long)]
  recompute_all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("JOBFIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = resolve_home(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let engine = jobfit_server::build_engine(&server_cfg, store)
    .context("invalid engine configuration")?;

  // Helper mode: rebuild the whole score matrix and exit.
  if cli.recompute_all {
    let candidates = engine
      .recompute_for_all_candidates()
      .await
      .context("recompute failed")?;
    println!("rescored {candidates} candidates");
    return Ok(());
  }

  let app = jobfit_server::router(Arc::new(engine));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Resolve a leading `~` component against `$HOME`.
fn resolve_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
