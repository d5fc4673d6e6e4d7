//! Word-level n-gram language modelling library.
//!
//! This crate provides a smoothed quadgram language model including:
//! - Frequency and conditional frequency counters
//! - Training from a corpus of tokenized sentences
//! - Interpolated scoring of sentences (linear and log space) and perplexity
//! - Random sentence generation from an injected random source
//! - Corpus file helpers used by the binaries

/// Counters, the quadgram model and its configuration.
pub mod model;

/// I/O utilities (corpus loading, path helpers).
pub mod io;
