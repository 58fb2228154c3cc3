//! Embedding providers for the jobfit matching engine.
//!
//! - [`LexicalEmbedder`]: deterministic feature hashing over normalised
//!   terms; needs no model and no network.
//! - [`HttpEmbedder`]: client for a remote embeddings endpoint.
//! - [`CachedEmbedder`]: memoises any provider by text digest.
//!
//! [`Embedder`] selects one of the first two at runtime from an
//! [`EmbedderConfig`].

mod cache;
mod config;
mod http;
mod lexical;

pub mod error;

pub use cache::CachedEmbedder;
pub use config::{Embedder, EmbedderConfig, EmbedderKind};
pub use error::{Error, Result};
pub use http::HttpEmbedder;
pub use lexical::{LexicalEmbedder, terms};
