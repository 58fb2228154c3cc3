//! Pairwise similarity between texts, on a 0–100 scale.

use crate::{Error, Result, embedding::EmbeddingProvider, profile::scoring_text};

/// Cosine similarity in `[-1, 1]`. Zero-length, zero-norm, or mismatched
/// vectors score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() {
    tracing::warn!(
      a_len = a.len(),
      b_len = b.len(),
      "embedding dimension mismatch; returning zero similarity"
    );
    return 0.0;
  }

  let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
  let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }

  (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine similarity scaled to `[0, 100]`. Anti-correlated vectors clamp to 0.
pub fn similarity_score(a: &[f32], b: &[f32]) -> f64 {
  f64::from(cosine_similarity(a, b).max(0.0)) * 100.0
}

/// Embeds two texts and compares them.
#[derive(Debug, Clone)]
pub struct SimilarityScorer<E> {
  embedder: E,
}

impl<E: EmbeddingProvider> SimilarityScorer<E> {
  pub fn new(embedder: E) -> Self { Self { embedder } }

  pub fn embedder(&self) -> &E { &self.embedder }

  /// Embed one field's text, after sentinel coercion.
  pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self
      .embedder
      .embed(scoring_text(text))
      .await
      .map_err(Error::embedding)
  }

  /// Symmetric, bounded similarity of two texts. Empty input is valid.
  pub async fn similarity(&self, a: &str, b: &str) -> Result<f64> {
    let va = self.embed(a).await?;
    let vb = self.embed(b).await?;
    Ok(similarity_score(&va, &vb))
  }
}
