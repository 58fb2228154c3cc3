//! [`CachedEmbedder`] memoises vectors by SHA-256 of the input text.
//!
//! Embeddings are deterministic per model, so caching never changes a
//! score. Failures are not cached. Once full, the least recently used text is
//! evicted.

use std::future::Future;

use jobfit_core::embedding::EmbeddingProvider;
use linked_hash_map::LinkedHashMap;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

type Digest256 = [u8; 32];

pub struct CachedEmbedder<E> {
  inner:    E,
  capacity: usize,
  /// Front is least recently used.
  entries:  RwLock<LinkedHashMap<Digest256, Vec<f32>>>,
}

impl<E: EmbeddingProvider> CachedEmbedder<E> {
  /// Cache at most `capacity` distinct texts. `0` stores nothing.
  pub fn new(inner: E, capacity: usize) -> Self {
    Self {
      inner,
      capacity,
      entries: RwLock::new(LinkedHashMap::new()),
    }
  }

  pub fn inner(&self) -> &E { &self.inner }

  pub async fn len(&self) -> usize { self.entries.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.entries.read().await.is_empty() }

  /// Whether `text` is currently cached. Does not touch recency.
  pub async fn contains(&self, text: &str) -> bool {
    self.entries.read().await.contains_key(&digest(text))
  }

  async fn lookup(&self, text: &str) -> Result<Vec<f32>, E::Error> {
    let key = digest(text);

    // get_refresh moves a hit to the back, so a write lock is needed.
    if let Some(hit) = self.entries.write().await.get_refresh(&key) {
      return Ok(hit.clone());
    }

    let vector = self.inner.embed(text).await?;
    if self.capacity == 0 {
      return Ok(vector);
    }

    let mut entries = self.entries.write().await;
    while entries.len() >= self.capacity {
      if entries.pop_front().is_none() {
        break;
      }
      debug!(capacity = self.capacity, "embedding cache evicted oldest entry");
    }
    entries.insert(key, vector.clone());
    Ok(vector)
  }
}

fn digest(text: &str) -> Digest256 { Sha256::digest(text.as_bytes()).into() }

impl<E: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<E> {
  type Error = E::Error;

  fn name(&self) -> &str { self.inner.name() }

  fn dimension(&self) -> usize { self.inner.dimension() }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Self::Error>> + Send + 'a {
    self.lookup(text)
  }
}
