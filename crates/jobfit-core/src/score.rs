//! Score rows of the derived candidate × job matrix.
//!
//! A score row is a disposable artifact of profile text. It is never
//! patched; every recompute replaces a candidate's whole row set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::{CandidateId, JobId};

/// The four per-attribute similarities, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
  /// Candidate skills vs. job required skills.
  pub skill_score:      f64,
  /// Candidate qualifications vs. job qualifications.
  pub education_score:  f64,
  /// Candidate project domains vs. job required skills.
  pub project_score:    f64,
  /// Candidate experience vs. job experience requirement.
  pub experience_score: f64,
}

/// One freshly computed row, as handed to
/// [`crate::store::ScoreMatrix::replace_scores_for_candidate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewScore {
  pub job_id:            JobId,
  pub sub_scores:        SubScores,
  pub eligibility_score: f64,
}

/// A persisted score row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
  pub candidate_id:      CandidateId,
  pub job_id:            JobId,
  #[serde(flatten)]
  pub sub_scores:        SubScores,
  pub eligibility_score: f64,
  pub computed_at:       DateTime<Utc>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A score row joined with job metadata, as returned to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
  pub job_id:            JobId,
  pub title:             String,
  pub company:           String,
  pub location:          String,
  #[serde(flatten)]
  pub sub_scores:        SubScores,
  pub eligibility_score: f64,
}

/// A score row joined with candidate metadata, as returned to a recruiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
  pub candidate_id:      CandidateId,
  pub name:              String,
  pub email:             String,
  #[serde(flatten)]
  pub sub_scores:        SubScores,
  pub eligibility_score: f64,
}
