//! The `ProfileStore` and `ScoreMatrix` traits and supporting query types.
//!
//! Both traits are implemented by storage backends (e.g.
//! `jobfit-store-sqlite`). The [`crate::engine::MatchingEngine`] depends on
//! these abstractions, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  profile::{Candidate, CandidateId, Job, JobId, NewCandidate, NewJob},
  score::{NewScore, RankedCandidate, RankedMatch, Score},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`ProfileStore::list_jobs`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQuery {
  /// Substring filter over title, company and required skills.
  pub text:     Option<String>,
  /// Exact company match.
  pub company:  Option<String>,
  /// Exact location match.
  pub location: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// Distinct filter values across all stored jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFacets {
  pub companies: Vec<String>,
  pub locations: Vec<String>,
}

/// Result of [`ProfileStore::upsert_candidate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upserted {
  pub candidate: Candidate,
  /// `true` when a new row was inserted, `false` when an existing row with
  /// the same email was overwritten.
  pub created:   bool,
}

// ─── Profiles ────────────────────────────────────────────────────────────────

/// Candidate and job records.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert-or-update keyed by normalised email.
  ///
  /// An existing row keeps its id and `created_at`; every other field is
  /// overwritten. Input without a usable email always inserts. Writing the
  /// profile alone never touches the score matrix.
  fn upsert_candidate(
    &self,
    input: NewCandidate,
  ) -> impl Future<Output = Result<Upserted, Self::Error>> + Send + '_;

  /// Always inserts; there is no identity resolution for jobs.
  fn insert_job(
    &self,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  fn get_candidate(
    &self,
    id: CandidateId,
  ) -> impl Future<Output = Result<Option<Candidate>, Self::Error>> + Send + '_;

  fn get_job(
    &self,
    id: JobId,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// Every candidate, ordered by id.
  fn list_candidates(
    &self,
  ) -> impl Future<Output = Result<Vec<Candidate>, Self::Error>> + Send + '_;

  /// Jobs matching `query`, ordered by id.
  fn list_jobs<'a>(
    &'a self,
    query: &'a JobQuery,
  ) -> impl Future<Output = Result<Vec<Job>, Self::Error>> + Send + 'a;

  fn job_facets(
    &self,
  ) -> impl Future<Output = Result<JobFacets, Self::Error>> + Send + '_;
}

// ─── Score matrix ────────────────────────────────────────────────────────────

/// The derived candidate × job score matrix.
///
/// At most one row exists per `(candidate_id, job_id)`. Rows are only ever
/// written through [`ScoreMatrix::replace_scores_for_candidate`].
pub trait ScoreMatrix: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Delete every row for `candidate_id` and insert `rows`, as one atomic
  /// unit. Readers never observe the candidate with a partial or empty set
  /// in between.
  fn replace_scores_for_candidate(
    &self,
    candidate_id: CandidateId,
    rows: Vec<NewScore>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Rows for a candidate joined with job metadata, by eligibility
  /// descending then job id ascending.
  fn ranked_for_candidate(
    &self,
    candidate_id: CandidateId,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<RankedMatch>, Self::Error>> + Send + '_;

  /// Rows for a job joined with candidate metadata, by eligibility
  /// descending then candidate id ascending.
  fn ranked_for_job(
    &self,
    job_id: JobId,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<RankedCandidate>, Self::Error>> + Send + '_;

  /// Raw rows for a candidate, ordered by job id.
  fn scores_for_candidate(
    &self,
    candidate_id: CandidateId,
  ) -> impl Future<Output = Result<Vec<Score>, Self::Error>> + Send + '_;

  fn count_scores_for_job(
    &self,
    job_id: JobId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
