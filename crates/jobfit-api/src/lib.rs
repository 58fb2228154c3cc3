//! JSON REST API for jobfit.
//!
//! Exposes an axum [`Router`] backed by a [`MatchingEngine`] over any store
//! and embedding provider. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jobfit_api::api_router(engine.clone()))
//! ```

pub mod candidates;
pub mod error;
pub mod jobs;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use jobfit_core::{
  embedding::EmbeddingProvider,
  engine::MatchingEngine,
  store::{ProfileStore, ScoreMatrix},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub use error::ApiError;

/// Shared handler state.
pub type Engine<S, E> = Arc<MatchingEngine<S, E>>;

/// `?limit=` on ranked endpoints. Absent means every row.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
  pub limit: Option<usize>,
}

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, E>(engine: Engine<S, E>) -> Router<()>
where
  S: ProfileStore + ScoreMatrix + 'static,
  E: EmbeddingProvider + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Candidates
    .route(
      "/candidates",
      get(candidates::list::<S, E>).post(candidates::upsert::<S, E>),
    )
    .route("/candidates/{id}", get(candidates::get_one::<S, E>))
    .route("/candidates/{id}/recompute", post(candidates::recompute::<S, E>))
    .route("/candidates/{id}/matches", get(candidates::matches::<S, E>))
    // Jobs
    .route("/jobs", get(jobs::list::<S, E>).post(jobs::create::<S, E>))
    .route("/jobs/facets", get(jobs::facets::<S, E>))
    .route("/jobs/{id}", get(jobs::get_one::<S, E>))
    .route("/jobs/{id}/candidates", get(jobs::candidates::<S, E>))
    // Whole matrix
    .route("/recompute", post(recompute_all::<S, E>))
    .with_state(engine)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

#[derive(Debug, Serialize)]
pub struct RecomputeAllSummary {
  pub candidates: usize,
}

/// `POST /recompute`: rescore every candidate against every job.
pub async fn recompute_all<S, E>(
  State(engine): State<Engine<S, E>>,
) -> Result<Json<RecomputeAllSummary>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let candidates = engine.recompute_for_all_candidates().await?;
  Ok(Json(RecomputeAllSummary { candidates }))
}
