//! Error type for `jobfit-embed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("embedding request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("embedding service returned no vectors")]
  EmptyResponse,

  #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },

  #[error("invalid embedder configuration: {0}")]
  InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
