//! Runtime selection of an embedding backend.

use std::{future::Future, time::Duration};

use jobfit_core::embedding::EmbeddingProvider;
use serde::Deserialize;

use crate::{Error, HttpEmbedder, LexicalEmbedder, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
  #[default]
  Lexical,
  Http,
}

/// The `[embedder]` section of the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedderConfig {
  #[serde(default)]
  pub kind:           EmbedderKind,
  #[serde(default = "default_dimension")]
  pub dimension:      usize,
  /// Embeddings endpoint; required for `http`.
  pub url:            Option<String>,
  /// Model name sent to the endpoint; required for `http`.
  pub model:          Option<String>,
  pub api_key:        Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:   u64,
  /// Distinct texts to memoise. `0` disables the cache.
  #[serde(default = "default_cache_capacity")]
  pub cache_capacity: usize,
}

fn default_dimension() -> usize { LexicalEmbedder::DEFAULT_DIMENSION }

fn default_timeout_secs() -> u64 { 30 }

fn default_cache_capacity() -> usize { 10_000 }

impl Default for EmbedderConfig {
  fn default() -> Self {
    Self {
      kind:           EmbedderKind::default(),
      dimension:      default_dimension(),
      url:            None,
      model:          None,
      api_key:        None,
      timeout_secs:   default_timeout_secs(),
      cache_capacity: default_cache_capacity(),
    }
  }
}

// ─── Embedder ────────────────────────────────────────────────────────────────

/// One of the concrete providers, chosen from configuration.
#[derive(Debug, Clone)]
pub enum Embedder {
  Lexical(LexicalEmbedder),
  Http(HttpEmbedder),
}

impl Embedder {
  pub fn from_config(cfg: &EmbedderConfig) -> Result<Self> {
    if cfg.dimension == 0 {
      return Err(Error::InvalidConfig("dimension must be positive".into()));
    }
    match cfg.kind {
      EmbedderKind::Lexical => Ok(Self::Lexical(LexicalEmbedder::new(cfg.dimension))),
      EmbedderKind::Http => {
        let url = cfg
          .url
          .clone()
          .ok_or_else(|| Error::InvalidConfig("http embedder needs `url`".into()))?;
        let model = cfg
          .model
          .clone()
          .ok_or_else(|| Error::InvalidConfig("http embedder needs `model`".into()))?;
        Ok(Self::Http(HttpEmbedder::new(
          url,
          model,
          cfg.api_key.clone(),
          cfg.dimension,
          Duration::from_secs(cfg.timeout_secs),
        )?))
      }
    }
  }
}

impl EmbeddingProvider for Embedder {
  type Error = Error;

  fn name(&self) -> &str {
    match self {
      Self::Lexical(e) => e.name(),
      Self::Http(e) => e.name(),
    }
  }

  fn dimension(&self) -> usize {
    match self {
      Self::Lexical(e) => e.dimension(),
      Self::Http(e) => e.dimension(),
    }
  }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>>> + Send + 'a {
    async move {
      match self {
        Self::Lexical(e) => Ok(e.embed_text(text)),
        Self::Http(e) => e.fetch(text).await,
      }
    }
  }
}
