use rand::Rng;

/// A trained model able to score and generate sentences.
///
/// Sentences are ordered sequences of already tokenized words. Boundary
/// tokens are handled by the implementation and must not be part of the
/// input.
pub trait LanguageModel {
	/// Probability of the whole sentence, in `[0, 1]`.
	///
	/// Computed as a plain product of per-token probabilities, so it may
	/// underflow to `0.0` on long sentences.
	fn sentence_probability<S: AsRef<str>>(&self, sentence: &[S]) -> f64;

	/// Natural logarithm of [`sentence_probability`](LanguageModel::sentence_probability).
	fn sentence_log_probability<S: AsRef<str>>(&self, sentence: &[S]) -> f64 {
		self.sentence_probability(sentence).ln()
	}

	/// Samples one sentence from the model, without boundary tokens.
	fn generate_sentence<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String>;

	/// Alias of [`sentence_probability`](LanguageModel::sentence_probability).
	fn score<S: AsRef<str>>(&self, sentence: &[S]) -> f64 {
		self.sentence_probability(sentence)
	}

	/// Alias of [`generate_sentence`](LanguageModel::generate_sentence).
	fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
		self.generate_sentence(rng)
	}
}
