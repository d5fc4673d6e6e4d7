use serde::{Deserialize, Serialize};

/// Default weight of the quadgram estimate.
pub const DEFAULT_QUADGRAM_WEIGHT: f64 = 0.65;
/// Default weight of the trigram estimate.
pub const DEFAULT_TRIGRAM_WEIGHT: f64 = 0.20;
/// Default weight of the bigram estimate.
pub const DEFAULT_BIGRAM_WEIGHT: f64 = 0.10;

/// Smallest accepted unigram weight.
///
/// The unigram term is the only one defined for every word (through
/// `UNKNOWN`), so it must keep some mass for every probability to be non-zero.
pub const MIN_UNIGRAM_WEIGHT: f64 = 1e-9;

/// Linear interpolation weights for the four n-gram orders.
///
/// Only the quadgram, trigram and bigram weights are stored; the unigram
/// weight is whatever is left so that the four weights always sum to 1.
///
/// # Invariants
/// - Every weight is finite and >= 0
/// - `unigram() >= MIN_UNIGRAM_WEIGHT`, so the four weights are a convex
///   combination with a non-zero unigram share
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "RawInterpolation", into = "RawInterpolation")]
pub struct Interpolation {
	quadgram: f64,
	trigram: f64,
	bigram: f64,
}

/// Unvalidated form used for (de)serialization.
#[derive(Serialize, Deserialize)]
struct RawInterpolation {
	quadgram: f64,
	trigram: f64,
	bigram: f64,
}

impl Interpolation {
	/// Creates a new set of interpolation weights.
	///
	/// # Errors
	/// Returns an error if a weight is negative or not finite, or if the
	/// three weights leave less than `MIN_UNIGRAM_WEIGHT` to the unigram.
	pub fn new(quadgram: f64, trigram: f64, bigram: f64) -> Result<Self, String> {
		for (name, weight) in [("quadgram", quadgram), ("trigram", trigram), ("bigram", bigram)] {
			if !weight.is_finite() || weight < 0.0 {
				return Err(format!("{} weight must be a finite value >= 0.0, got {}", name, weight));
			}
		}
		let interpolation = Self { quadgram, trigram, bigram };
		// Checked with the exact expression used when scoring
		let unigram = interpolation.unigram();
		if unigram < MIN_UNIGRAM_WEIGHT {
			return Err(format!(
				"Interpolation weights must leave a unigram weight > 0.0, got {} (sum {})",
				unigram,
				quadgram + trigram + bigram
			));
		}
		Ok(interpolation)
	}

	/// Parses weights written as `"quadgram,trigram,bigram"`, ex. `"0.65,0.2,0.1"`.
	///
	/// # Errors
	/// Returns an error if the string does not hold exactly three numbers or
	/// if the weights are invalid (see [`Interpolation::new`]).
	pub fn parse(value: &str) -> Result<Self, String> {
		let weights = value
			.split(',')
			.map(|part| part.trim().parse::<f64>().map_err(|e| format!("Invalid weight '{}': {}", part.trim(), e)))
			.collect::<Result<Vec<_>, _>>()?;
		match weights.as_slice() {
			[quadgram, trigram, bigram] => Self::new(*quadgram, *trigram, *bigram),
			_ => Err(format!("Expected 3 comma separated weights, got {}", weights.len())),
		}
	}

	pub fn quadgram(&self) -> f64 {
		self.quadgram
	}

	pub fn trigram(&self) -> f64 {
		self.trigram
	}

	pub fn bigram(&self) -> f64 {
		self.bigram
	}

	/// Weight of the unigram estimate: `1 - quadgram - trigram - bigram`.
	pub fn unigram(&self) -> f64 {
		1.0 - self.quadgram - self.trigram - self.bigram
	}

	/// Combines the four estimates, highest order first.
	pub fn combine(&self, quadgram: f64, trigram: f64, bigram: f64, unigram: f64) -> f64 {
		self.quadgram * quadgram + self.trigram * trigram + self.bigram * bigram + self.unigram() * unigram
	}
}

impl Default for Interpolation {
	fn default() -> Self {
		Self {
			quadgram: DEFAULT_QUADGRAM_WEIGHT,
			trigram: DEFAULT_TRIGRAM_WEIGHT,
			bigram: DEFAULT_BIGRAM_WEIGHT,
		}
	}
}

impl TryFrom<RawInterpolation> for Interpolation {
	type Error = String;

	fn try_from(raw: RawInterpolation) -> Result<Self, Self::Error> {
		Self::new(raw.quadgram, raw.trigram, raw.bigram)
	}
}

impl From<Interpolation> for RawInterpolation {
	fn from(interpolation: Interpolation) -> Self {
		Self {
			quadgram: interpolation.quadgram,
			trigram: interpolation.trigram,
			bigram: interpolation.bigram,
		}
	}
}

/// Configuration of a [`QuadgramLanguageModel`](super::quadgram_model::QuadgramLanguageModel).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ModelConfig {
	/// Interpolation weights used when scoring.
	#[serde(default)]
	pub interpolation: Interpolation,
}

impl ModelConfig {
	pub fn with_interpolation(interpolation: Interpolation) -> Self {
		Self { interpolation }
	}
}
