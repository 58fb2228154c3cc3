//! Handlers for `/jobs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/jobs` | Optional `?text=&company=&location=&limit=&offset=` |
//! | `POST` | `/jobs` | Insert, then rescore every candidate; always `201` |
//! | `GET`  | `/jobs/facets` | Distinct companies and locations |
//! | `GET`  | `/jobs/{id}` | 404 if not found |
//! | `GET`  | `/jobs/{id}/candidates` | Ranked candidates; optional `?limit=` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use jobfit_core::{
  embedding::EmbeddingProvider,
  profile::{Job, JobId, NewJob},
  score::RankedCandidate,
  store::{JobFacets, JobQuery, ProfileStore, ScoreMatrix},
};

use crate::{Engine, LimitParams, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /jobs[?text=..&company=..&location=..&limit=..&offset=..]`
pub async fn list<S, E>(
  State(engine): State<Engine<S, E>>,
  Query(query): Query<JobQuery>,
) -> Result<Json<Vec<Job>>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let jobs = engine
    .store()
    .list_jobs(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(jobs))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /jobs` with a [`NewJob`] body; every field optional.
pub async fn create<S, E>(
  State(engine): State<Engine<S, E>>,
  Json(body): Json<NewJob>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let job = engine.ingest_job(body).await?;
  Ok((StatusCode::CREATED, Json(job)))
}

// ─── Facets ───────────────────────────────────────────────────────────────────

/// `GET /jobs/facets`
pub async fn facets<S, E>(
  State(engine): State<Engine<S, E>>,
) -> Result<Json<JobFacets>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let facets = engine
    .store()
    .job_facets()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(facets))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /jobs/{id}`
pub async fn get_one<S, E>(
  State(engine): State<Engine<S, E>>,
  Path(id): Path<JobId>,
) -> Result<Json<Job>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let job = engine
    .store()
    .get_job(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))?;
  Ok(Json(job))
}

// ─── Ranked candidates ────────────────────────────────────────────────────────

/// `GET /jobs/{id}/candidates[?limit=<n>]`
pub async fn candidates<S, E>(
  State(engine): State<Engine<S, E>>,
  Path(id): Path<JobId>,
  Query(params): Query<LimitParams>,
) -> Result<Json<Vec<RankedCandidate>>, ApiError>
where
  S: ProfileStore + ScoreMatrix,
  E: EmbeddingProvider,
{
  let ranked = engine.ranked_candidates(id, params.limit).await?;
  Ok(Json(ranked))
}
