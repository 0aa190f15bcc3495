//! Core trait abstractions for the external-service seams.

pub mod embedder;
pub mod searcher;
