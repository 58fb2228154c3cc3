//! Candidate and job profiles.
//!
//! Profiles arrive as loosely structured string fields produced by an
//! upstream extraction service. Every text field may be absent or carry a
//! "missing" sentinel; neither is an error. Absent fields are stored as the
//! empty string and sentinels are coerced to empty only at scoring time, so
//! the stored text is always what the caller sent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Store-assigned candidate identifier. Stable across upserts.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(pub i64);

/// Store-assigned job identifier. Ascending ids follow insertion order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for CandidateId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl fmt::Display for JobId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A stored candidate profile. `email` is the identity key for upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
  pub candidate_id:   CandidateId,
  pub name:           String,
  /// Normalised (trimmed, lower-cased). May be empty.
  pub email:          String,
  pub phone:          String,
  pub linkedin:       String,
  pub skills:         String,
  pub qualifications: String,
  /// Domain/expertise summary of the candidate's projects.
  pub projects:       String,
  /// Experience and achievements, merged.
  pub experience:     String,
  pub created_at:     DateTime<Utc>,
  /// Bumped on every upsert that resolves to this row.
  pub updated_at:     DateTime<Utc>,
}

/// Input to [`crate::store::ProfileStore::upsert_candidate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCandidate {
  pub name:           Option<String>,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub linkedin:       Option<String>,
  pub skills:         Option<String>,
  pub qualifications: Option<String>,
  pub projects:       Option<String>,
  pub experience:     Option<String>,
}

impl NewCandidate {
  /// The identity key this input resolves against, or `None` when the
  /// profile carries no usable email.
  pub fn identity(&self) -> Option<String> {
    let email = normalize_email(self.email.as_deref().unwrap_or_default());
    (!email.is_empty()).then_some(email)
  }
}

// ─── Job ─────────────────────────────────────────────────────────────────────

/// A stored job posting. Jobs are never updated; every ingestion creates a
/// new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub job_id:           JobId,
  pub title:            String,
  pub company:          String,
  pub location:         String,
  pub required_skills:  String,
  pub experience:       String,
  pub qualifications:   String,
  pub responsibilities: String,
  pub benefits:         String,
  pub other_details:    String,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::ProfileStore::insert_job`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
  pub title:            Option<String>,
  pub company:          Option<String>,
  pub location:         Option<String>,
  pub required_skills:  Option<String>,
  pub experience:       Option<String>,
  pub qualifications:   Option<String>,
  pub responsibilities: Option<String>,
  pub benefits:         Option<String>,
  pub other_details:    Option<String>,
}

// ─── Field coercion ──────────────────────────────────────────────────────────

/// Values the extraction service emits when it found nothing.
const MISSING_SENTINELS: &[&str] = &["none", "not mentioned", "n/a", "null"];

/// Normalise an email for identity comparison.
pub fn normalize_email(raw: &str) -> String { raw.trim().to_lowercase() }

/// The text that should be embedded for a stored field: trimmed, with
/// missing-data sentinels coerced to the empty string.
pub fn scoring_text(raw: &str) -> &str {
  let trimmed = raw.trim();
  if MISSING_SENTINELS
    .iter()
    .any(|s| trimmed.eq_ignore_ascii_case(s))
  {
    ""
  } else {
    trimmed
  }
}
