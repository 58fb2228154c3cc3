//! Error types for `jobfit-core`.

use thiserror::Error;

use crate::profile::{CandidateId, JobId};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("candidate not found: {0}")]
  CandidateNotFound(CandidateId),

  #[error("job not found: {0}")]
  JobNotFound(JobId),

  /// The embedding model could not produce a vector. Fatal for the
  /// recompute that hit it; nothing is written.
  #[error("embedding unavailable: {0}")]
  EmbeddingUnavailable(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub fn embedding(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::EmbeddingUnavailable(Box::new(e))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::CandidateNotFound(_) | Self::JobNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
