use log::{debug, info, warn};
use rand::Rng;

use super::conditional_counter::ConditionalFrequencyCounter;
use super::config::{Interpolation, ModelConfig};
use super::frequency_counter::FrequencyCounter;
use super::language_model::LanguageModel;

/// Token prepended (three times) to every sentence.
pub const START: &str = "<S>";
/// Token appended to every sentence.
pub const STOP: &str = "</S>";
/// Placeholder standing for every word never seen during training.
pub const UNKNOWN: &str = "*UNKNOWN*";

/// Number of preceding tokens conditioning a quadgram.
const HISTORY: usize = 3;

/// Counter of the tokens observed after a context of preceding tokens.
///
/// Contexts are ordered token sequences, so `["ab", "c"]` and `["a", "bc"]`
/// never collide.
pub type ContextCounter = ConditionalFrequencyCounter<Vec<String>, String>;

/// Word-level quadgram language model with linear interpolation smoothing.
///
/// The model is trained and normalized once, in the constructor, and is
/// immutable afterwards: it can be shared between threads for concurrent
/// scoring and generation. Retraining means building a new model.
///
/// # Responsibilities
/// - Count unigrams, and bigrams/trigrams/quadgrams by their preceding context
/// - Score a transition by interpolating the four orders
/// - Score whole sentences (linear or log space)
/// - Sample words and sentences from the unigram distribution
///
/// # Invariants
/// - Every counter is normalized (sums to 1.0, or is empty)
/// - `UNKNOWN` always has a non-zero unigram probability
#[derive(Clone, Debug, PartialEq)]
pub struct QuadgramLanguageModel {
	config: ModelConfig,

	/// Unconditional distribution over the vocabulary, `STOP` and `UNKNOWN`.
	unigrams: FrequencyCounter<String>,

	/// Next-token distributions keyed by the 1, 2 and 3 preceding tokens.
	bigrams: ContextCounter,
	trigrams: ContextCounter,
	quadgrams: ContextCounter,
}

/// Frames a sentence as `START START START tokens... STOP`.
fn frame<S: AsRef<str>>(sentence: &[S]) -> Vec<String> {
	let mut framed = Vec::with_capacity(sentence.len() + HISTORY + 1);
	framed.extend((0..HISTORY).map(|_| START.to_owned()));
	framed.extend(sentence.iter().map(|token| token.as_ref().to_owned()));
	framed.push(STOP.to_owned());
	framed
}

impl QuadgramLanguageModel {
	/// Trains a model on `corpus` using the default interpolation weights.
	pub fn new<I, S, T>(corpus: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[T]>,
		T: AsRef<str>,
	{
		Self::with_config(corpus, ModelConfig::default())
	}

	/// Trains a model on `corpus`.
	///
	/// # Behavior
	/// - Frames every sentence with three `START` and one `STOP` tokens.
	/// - For every token after the leading `START`s, records the unigram and
	///   the bigram/trigram/quadgram transitions from its preceding tokens.
	/// - Adds a single count for `UNKNOWN`.
	/// - Normalizes all four counters.
	pub fn with_config<I, S, T>(corpus: I, config: ModelConfig) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[T]>,
		T: AsRef<str>,
	{
		let mut model = Self {
			config,
			unigrams: FrequencyCounter::new(),
			bigrams: ContextCounter::new(),
			trigrams: ContextCounter::new(),
			quadgrams: ContextCounter::new(),
		};

		let mut sentences = 0usize;
		for sentence in corpus {
			model.add_sentence(sentence.as_ref());
			sentences += 1;
		}
		model.unigrams.increment(UNKNOWN.to_owned(), 1.0);
		model.normalize();

		info!(
			"Trained quadgram model on {} sentences: {} word types, {} bigram / {} trigram / {} quadgram contexts",
			sentences,
			model.unigrams.len(),
			model.bigrams.len(),
			model.trigrams.len(),
			model.quadgrams.len()
		);
		model
	}

	/// Records every transition of one sentence.
	fn add_sentence<T: AsRef<str>>(&mut self, sentence: &[T]) {
		let framed = frame(sentence);
		for window in framed.windows(HISTORY + 1) {
			let word = &window[HISTORY];
			self.unigrams.increment(word.clone(), 1.0);
			self.bigrams.increment_count(window[2..HISTORY].to_vec(), word.clone(), 1.0);
			self.trigrams.increment_count(window[1..HISTORY].to_vec(), word.clone(), 1.0);
			self.quadgrams.increment_count(window[..HISTORY].to_vec(), word.clone(), 1.0);
		}
	}

	fn normalize(&mut self) {
		self.quadgrams.normalize();
		self.trigrams.normalize();
		self.bigrams.normalize();
		self.unigrams.normalize();
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn interpolation(&self) -> &Interpolation {
		&self.config.interpolation
	}

	pub fn unigrams(&self) -> &FrequencyCounter<String> {
		&self.unigrams
	}

	pub fn bigrams(&self) -> &ContextCounter {
		&self.bigrams
	}

	pub fn trigrams(&self) -> &ContextCounter {
		&self.trigrams
	}

	pub fn quadgrams(&self) -> &ContextCounter {
		&self.quadgrams
	}

	/// Number of distinct unigram entries, `STOP` and `UNKNOWN` included.
	pub fn vocabulary_size(&self) -> usize {
		self.unigrams.len()
	}

	/// Returns `true` if `word` was observed during training.
	pub fn contains(&self, word: &str) -> bool {
		word != UNKNOWN && self.unigrams.get_count(word) > 0.0
	}

	/// Unigram probability of `word`, `0.0` if it was never observed.
	pub fn unigram_probability(&self, word: &str) -> f64 {
		self.unigrams.get_count(word)
	}

	/// Interpolated probability of `word` following `w1 w2 w3`.
	///
	/// If `word` was never observed, the unigram term uses the probability
	/// of `UNKNOWN` instead and a warning is logged.
	pub fn quadgram_probability(&self, w1: &str, w2: &str, w3: &str, word: &str) -> f64 {
		let history = [w1.to_owned(), w2.to_owned(), w3.to_owned()];
		self.transition_probability(&history, word)
	}

	/// Same as [`quadgram_probability`](Self::quadgram_probability), with the
	/// three preceding tokens given as a slice.
	fn transition_probability(&self, history: &[String], word: &str) -> f64 {
		let quadgram = self.quadgrams.get_count(&history[..HISTORY], word);
		let trigram = self.trigrams.get_count(&history[1..HISTORY], word);
		let bigram = self.bigrams.get_count(&history[2..HISTORY], word);
		let mut unigram = self.unigrams.get_count(word);
		if unigram == 0.0 {
			warn!("UNKNOWN word: {}", word);
			unigram = self.unigrams.get_count(UNKNOWN);
		}
		self.config.interpolation.combine(quadgram, trigram, bigram, unigram)
	}

	/// Applies `f` to the probability of every transition of the framed sentence.
	fn for_each_transition<S, F>(&self, sentence: &[S], mut f: F)
	where
		S: AsRef<str>,
		F: FnMut(f64),
	{
		let framed = frame(sentence);
		for window in framed.windows(HISTORY + 1) {
			f(self.transition_probability(&window[..HISTORY], &window[HISTORY]));
		}
	}

	/// Perplexity of the model on `sentences`.
	///
	/// `exp(-(sum of sentence log probabilities) / N)` where `N` counts every
	/// predicted token, the `STOP` of each sentence included.
	/// Returns `f64::INFINITY` when there is nothing to predict.
	pub fn perplexity<I, S, T>(&self, sentences: I) -> f64
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[T]>,
		T: AsRef<str>,
	{
		let mut log_probability = 0.0;
		let mut tokens = 0usize;
		for sentence in sentences {
			let sentence = sentence.as_ref();
			log_probability += self.sentence_log_probability(sentence);
			tokens += sentence.len() + 1;
		}
		if tokens == 0 {
			return f64::INFINITY;
		}
		(-log_probability / tokens as f64).exp()
	}

	/// Inverse-CDF lookup in the unigram distribution.
	///
	/// Walks the unigram keys in sorted order, accumulating probabilities,
	/// and returns the first key at which the running sum exceeds
	/// `quantile`. Falls back to `UNKNOWN` if rounding keeps the sum below
	/// `quantile`.
	pub fn word_at(&self, quantile: f64) -> &str {
		let mut sum = 0.0;
		for (word, probability) in self.unigrams.iter() {
			sum += probability;
			if sum > quantile {
				return word;
			}
		}
		UNKNOWN
	}

	/// Samples one word from the unigram distribution.
	pub fn generate_word<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
		self.word_at(rng.random::<f64>())
	}
}

impl LanguageModel for QuadgramLanguageModel {
	/// Product of the interpolated probability of every token and of the
	/// final `STOP`, each conditioned on its three preceding tokens.
	///
	/// # Notes
	/// - The product is not computed in log space: long sentences can
	///   underflow to `0.0`. Use `sentence_log_probability` for those.
	fn sentence_probability<S: AsRef<str>>(&self, sentence: &[S]) -> f64 {
		let mut probability = 1.0;
		self.for_each_transition(sentence, |p| probability *= p);
		probability
	}

	fn sentence_log_probability<S: AsRef<str>>(&self, sentence: &[S]) -> f64 {
		let mut log_probability = 0.0;
		self.for_each_transition(sentence, |p| log_probability += p.ln());
		log_probability
	}

	/// Draws words from the unigram distribution until `STOP` comes up.
	///
	/// The context is not consulted: every word is an independent unigram
	/// draw. The result is finite with probability 1 but has no fixed bound.
	fn generate_sentence<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
		let mut sentence = Vec::new();
		if self.unigrams.get_count(STOP) <= 0.0 {
			// Only happens with an empty corpus
			debug!("STOP has no probability mass, generating an empty sentence");
			return sentence;
		}
		loop {
			let word = self.generate_word(rng);
			if word == STOP {
				break;
			}
			sentence.push(word.to_owned());
		}
		sentence
	}
}
