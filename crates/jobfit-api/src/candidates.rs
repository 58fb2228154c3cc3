//! Handlers for `/candidates` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/candidates` | All profiles, ascending id |
//! | `POST` | `/candidates` | Upsert by email, then rescore; `201` on insert, `200` on update |
//! | `GET`  | `/candidates/{id}` | 404 if not found |
//! | `POST` | `/candidates/{id}/recompute` | Rescore against every job |
//! | `GET`  | `/candidates/{id}/matches` | Ranked jobs; optional `?limit=` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use jobfit_core::{
  embedding::EmbeddingProvider,
  profile::{Candidate, CandidateId, NewCandidate},
  score::RankedMatch,
  store::{ProfileStore, ScoreMatrix},
};
use serde::Serialize;

use crate::{Engine, LimitParams, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /candidates`
pub async fn list<S, E>(
  State(engine): State<Engine<S, E>>,
) -> Result<Json<Vec<Candidate>>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let candidates = engine
    .store()
    .list_candidates()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(candidates))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

/// `POST /candidates` with a [`NewCandidate`] body; every field optional.
///
/// The profile is written before scoring, so a `503` still leaves the
/// upserted profile in place with its previous scores.
pub async fn upsert<S, E>(
  State(engine): State<Engine<S, E>>,
  Json(body): Json<NewCandidate>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let upserted = engine.ingest_candidate(body).await?;
  let status = if upserted.created {
    StatusCode::CREATED
  } else {
    StatusCode::OK
  };
  Ok((status, Json(upserted)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /candidates/{id}`
pub async fn get_one<S, E>(
  State(engine): State<Engine<S, E>>,
  Path(id): Path<CandidateId>,
) -> Result<Json<Candidate>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let candidate = engine
    .store()
    .get_candidate(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("candidate {id} not found")))?;
  Ok(Json(candidate))
}

// ─── Recompute ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecomputeSummary {
  pub candidate_id: CandidateId,
  /// Score rows now held for the candidate.
  pub rows:         usize,
}

/// `POST /candidates/{id}/recompute`
pub async fn recompute<S, E>(
  State(engine): State<Engine<S, E>>,
  Path(id): Path<CandidateId>,
) -> Result<Json<RecomputeSummary>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let rows = engine.recompute_for_candidate(id).await?;
  Ok(Json(RecomputeSummary { candidate_id: id, rows }))
}

// ─── Matches ──────────────────────────────────────────────────────────────────

/// `GET /candidates/{id}/matches[?limit=<n>]`
pub async fn matches<S, E>(
  State(engine): State<Engine<S, E>>,
  Path(id): Path<CandidateId>,
  Query(params): Query<LimitParams>,
) -> Result<Json<Vec<RankedMatch>>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let ranked = engine.ranked_matches(id, params.limit).await?;
  Ok(Json(ranked))
}
