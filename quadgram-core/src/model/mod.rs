//! Top-level module of the quadgram language model.
//!
//! This module provides:
//! - Frequency counters (`FrequencyCounter`, `ConditionalFrequencyCounter`)
//! - The interpolated quadgram model (`QuadgramLanguageModel`)
//! - Its configuration (`ModelConfig`, `Interpolation`)
//! - The `LanguageModel` trait used by callers to score and generate

/// Key to weight mapping that can turn itself into a probability distribution.
pub mod frequency_counter;

/// Context to `FrequencyCounter` mapping, created lazily per context.
pub mod conditional_counter;

/// Interpolation weights and model configuration.
///
/// Serializable, so they can be read from query strings or files.
pub mod config;

/// Scoring and generation interface implemented by trained models.
pub mod language_model;

/// Word-level quadgram model with linear interpolation smoothing.
///
/// Handles training, normalization, transition and sentence scoring,
/// perplexity and unigram sampling.
pub mod quadgram_model;

pub use conditional_counter::ConditionalFrequencyCounter;
pub use config::{Interpolation, ModelConfig};
pub use frequency_counter::FrequencyCounter;
pub use language_model::LanguageModel;
pub use quadgram_model::{QuadgramLanguageModel, START, STOP, UNKNOWN};
