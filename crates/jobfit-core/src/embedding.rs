//! The `EmbeddingProvider` trait.

use std::future::Future;

/// Turns a text field into a fixed-length vector.
///
/// Implementations must be deterministic for a given model and input, and
/// must accept the empty string. Callers never pass missing values; they
/// coerce them to `""` first.
pub trait EmbeddingProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Short identifier used in logs, e.g. `"lexical"` or the remote model name.
  fn name(&self) -> &str;

  /// Length of every vector returned by [`Self::embed`].
  fn dimension(&self) -> usize;

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Self::Error>> + Send + 'a;
}

impl<E: EmbeddingProvider> EmbeddingProvider for std::sync::Arc<E> {
  type Error = E::Error;

  fn name(&self) -> &str { (**self).name() }

  fn dimension(&self) -> usize { (**self).dimension() }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Self::Error>> + Send + 'a {
    (**self).embed(text)
  }
}
