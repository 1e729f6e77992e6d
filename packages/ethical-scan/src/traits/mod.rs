//! Core trait abstractions for the resolution pipeline.
//!
//! Every external source is reached through the same `Provider` capability so
//! the pipeline can be assembled from real adapters or test doubles.

pub mod provider;
