//! [`HttpEmbedder`]: client for a remote embeddings endpoint.
//!
//! Speaks the common `POST {"model", "input"}` →
//! `{"data": [{"embedding": [...]}]}` shape. Any transport failure, non-2xx
//! status, malformed body or wrong-width vector is an error; there is no
//! fallback.

use std::{future::Future, time::Duration};

use jobfit_core::embedding::EmbeddingProvider;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
  embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct HttpEmbedder {
  client:    reqwest::Client,
  url:       String,
  model:     String,
  api_key:   Option<String>,
  dimension: usize,
}

impl HttpEmbedder {
  pub fn new(
    url: impl Into<String>,
    model: impl Into<String>,
    api_key: Option<String>,
    dimension: usize,
    timeout: Duration,
  ) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      url: url.into(),
      model: model.into(),
      api_key,
      dimension,
    })
  }

  /// Fetch one vector. Empty text is never sent; it embeds to zeros.
  pub async fn fetch(&self, text: &str) -> Result<Vec<f32>> {
    if text.is_empty() {
      return Ok(vec![0.0; self.dimension]);
    }

    debug!(model = %self.model, chars = text.len(), "requesting embedding");

    let body = serde_json::json!({ "model": self.model, "input": text });
    let mut request = self.client.post(&self.url).json(&body);
    if let Some(key) = &self.api_key {
      request = request.bearer_auth(key);
    }

    let response: EmbeddingResponse = request
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    let vector = response
      .data
      .into_iter()
      .next()
      .ok_or(Error::EmptyResponse)?
      .embedding;

    if vector.len() != self.dimension {
      return Err(Error::DimensionMismatch {
        expected: self.dimension,
        actual:   vector.len(),
      });
    }
    Ok(vector)
  }
}

impl EmbeddingProvider for HttpEmbedder {
  type Error = Error;

  fn name(&self) -> &str { &self.model }

  fn dimension(&self) -> usize { self.dimension }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>>> + Send + 'a {
    self.fetch(text)
  }
}
