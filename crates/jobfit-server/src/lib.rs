//! Application assembly for the jobfit server binary.
//!
//! Turns a [`ServerConfig`] into a ready-to-serve axum [`Router`] over a
//! SQLite store and the configured embedding provider.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use jobfit_core::{eligibility::EligibilityWeights, engine::MatchingEngine};
use jobfit_embed::{CachedEmbedder, Embedder, EmbedderConfig};
use jobfit_store_sqlite::SqliteStore;
use serde::Deserialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The engine the server runs: SQLite storage, a cached configured embedder.
pub type AppEngine = MatchingEngine<SqliteStore, CachedEmbedder<Embedder>>;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOBFIT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub embedder:   EmbedderConfig,
  /// Overrides the standard 0.4 / 0.2 / 0.2 / 0.1 weighting.
  #[serde(default)]
  pub weights:    Option<EligibilityWeights>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("jobfit.db") }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// A configuration that cannot be turned into an engine.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Embedder(#[from] jobfit_embed::Error),

  #[error("weights must be finite and non-negative: {0:?}")]
  InvalidWeights(EligibilityWeights),
}

/// Build the matching engine over an already-opened store.
pub fn build_engine(
  cfg: &ServerConfig,
  store: SqliteStore,
) -> Result<AppEngine, BuildError> {
  if let Some(weights) = cfg.weights
    && !weights.is_valid()
  {
    return Err(BuildError::InvalidWeights(weights));
  }

  let embedder = Embedder::from_config(&cfg.embedder)?;
  let embedder = CachedEmbedder::new(embedder, cfg.embedder.cache_capacity);

  let mut engine = MatchingEngine::new(Arc::new(store), embedder);
  if let Some(weights) = cfg.weights {
    engine = engine.with_weights(weights);
  }

  info!(
    embedder = ?cfg.embedder.kind,
    dimension = cfg.embedder.dimension,
    weight_total = engine.weights().total(),
    "matching engine ready"
  );
  Ok(engine)
}

/// The full HTTP application: the JSON API with request tracing.
pub fn router(engine: Arc<AppEngine>) -> Router {
  jobfit_api::api_router(engine).layer(TraceLayer::new_for_http())
}
