//! Deterministic lexical embeddings via feature hashing.
//!
//! Text is reduced to normalised terms, each term is hashed into one of
//! `dimension` buckets, and the term-frequency vector is L2-normalised.
//! Weights are never negative, so cosine similarity between two lexical
//! embeddings is always in `[0, 1]`.

use std::{convert::Infallible, future::Future};

use jobfit_core::embedding::EmbeddingProvider;
use sha2::{Digest, Sha256};

/// Tokens that carry no matching signal.
const STOP_WORDS: &[&str] = &[
  "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is",
  "of", "on", "or", "the", "to", "with",
];

/// Abbreviations and spelling variants, expanded to canonical terms.
/// Changing this table changes every embedding.
const ALIASES: &[(&str, &[&str])] = &[
  ("bsc", &["bachelor", "science"]),
  ("bs", &["bachelor", "science"]),
  ("ba", &["bachelor", "arts"]),
  ("btech", &["bachelor", "technology"]),
  ("bachelors", &["bachelor"]),
  ("msc", &["master", "science"]),
  ("ms", &["master", "science"]),
  ("mtech", &["master", "technology"]),
  ("masters", &["master"]),
  ("mba", &["master", "business", "administration"]),
  ("phd", &["doctorate"]),
  ("cs", &["computer", "science"]),
  ("cse", &["computer", "science", "engineering"]),
  ("it", &["information", "technology"]),
  ("ml", &["machine", "learning"]),
  ("ai", &["artificial", "intelligence"]),
  ("nlp", &["natural", "language", "processing"]),
  ("js", &["javascript"]),
  ("ts", &["typescript"]),
  ("py", &["python"]),
  ("golang", &["go"]),
  ("postgres", &["postgresql"]),
  ("k8s", &["kubernetes"]),
  ("yr", &["years"]),
  ("yrs", &["years"]),
  ("year", &["years"]),
  ("developers", &["developer"]),
  ("engineers", &["engineer"]),
];

/// Split `text` into normalised matching terms.
///
/// Lower-cases, splits on anything but alphanumerics and `+ # '`, strips
/// possessive `'s`, drops the `+` from numerals (`2+` → `2`), removes stop
/// words and expands aliases.
pub fn terms(text: &str) -> Vec<String> {
  let lower = text.to_lowercase();
  let mut out = Vec::new();

  for raw in lower.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '\''))) {
    let token = normalize_token(raw);
    if token.is_empty() || STOP_WORDS.contains(&token) {
      continue;
    }
    match ALIASES.iter().find(|(alias, _)| *alias == token) {
      Some((_, expansion)) => out.extend(expansion.iter().map(|t| (*t).to_owned())),
      None => out.push(token.to_owned()),
    }
  }

  out
}

fn normalize_token(raw: &str) -> &str {
  let t = raw.trim_matches('\'');
  let t = t.strip_suffix("'s").unwrap_or(t).trim_matches('\'');

  if !t.chars().any(char::is_alphanumeric) {
    return "";
  }

  let digits = t.trim_end_matches('+');
  if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
    digits
  } else {
    t
  }
}

// ─── Embedder ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LexicalEmbedder {
  dimension: usize,
}

impl LexicalEmbedder {
  /// Same width as common sentence-embedding models.
  pub const DEFAULT_DIMENSION: usize = 384;

  pub fn new(dimension: usize) -> Self {
    Self { dimension: dimension.max(1) }
  }

  fn bucket(&self, term: &str) -> usize {
    let digest = Sha256::digest(term.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_le_bytes(head) % self.dimension as u64) as usize
  }

  /// Embed synchronously; empty or stop-word-only text yields the zero
  /// vector.
  pub fn embed_text(&self, text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; self.dimension];
    for term in terms(text) {
      vector[self.bucket(&term)] += 1.0;
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
      for v in &mut vector {
        *v /= norm;
      }
    }
    vector
  }
}

impl Default for LexicalEmbedder {
  fn default() -> Self { Self::new(Self::DEFAULT_DIMENSION) }
}

impl EmbeddingProvider for LexicalEmbedder {
  type Error = Infallible;

  fn name(&self) -> &str { "lexical" }

  fn dimension(&self) -> usize { self.dimension }

  fn embed<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<f32>, Infallible>> + Send + 'a {
    async move { Ok(self.embed_text(text)) }
  }
}
