//! Core types and trait definitions for the jobfit matching engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ProfileStore`] and
//! [`store::ScoreMatrix`]; embedding backends implement
//! [`embedding::EmbeddingProvider`]. The [`engine::MatchingEngine`] ties the
//! three together.

// Native `async fn` / RPITIT in traits; futures are bounded `Send` explicitly.
#![allow(async_fn_in_trait)]

pub mod eligibility;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod profile;
pub mod score;
pub mod similarity;
pub mod store;

pub use error::{Error, Result};
