use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::frequency_counter::FrequencyCounter;

/// A mapping from a context to a [`FrequencyCounter`] over the tokens
/// observed after that context.
///
/// Conceptually, each context is a node in a Markov chain and its counter
/// holds the weighted outgoing edges.
///
/// ## Invariants
/// - Each sub-counter independently satisfies the `FrequencyCounter` invariants
/// - A context without observations is absent (never present with a zero total)
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalFrequencyCounter<C, K>
where
	C: Hash + Eq,
	K: Ord,
{
	counters: HashMap<C, FrequencyCounter<K>>,
}

impl<C: Hash + Eq, K: Ord> Default for ConditionalFrequencyCounter<C, K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C: Hash + Eq, K: Ord> ConditionalFrequencyCounter<C, K> {
	/// Creates a new empty conditional counter.
	pub fn new() -> Self {
		Self { counters: HashMap::new() }
	}

	/// Adds `amount` to `key` within the counter of `context`.
	///
	/// The context counter is created on first use.
	pub fn increment_count(&mut self, context: C, key: K, amount: f64) {
		self.counters.entry(context).or_default().increment(key, amount);
	}

	/// Returns the weight of `key` after `context`.
	///
	/// Unknown contexts read as `0.0`, as do unknown keys.
	pub fn get_count<CQ, KQ>(&self, context: &CQ, key: &KQ) -> f64
	where
		C: Borrow<CQ>,
		CQ: Hash + Eq + ?Sized,
		K: Borrow<KQ>,
		KQ: Ord + ?Sized,
	{
		self.counters
			.get(context)
			.map_or(0.0, |counter| counter.get_count(key))
	}

	/// Returns the counter of `context`, if it was ever observed.
	pub fn get_counter<CQ>(&self, context: &CQ) -> Option<&FrequencyCounter<K>>
	where
		C: Borrow<CQ>,
		CQ: Hash + Eq + ?Sized,
	{
		self.counters.get(context)
	}

	/// Normalizes every context counter in place, independently of the others.
	pub fn normalize(&mut self) {
		for counter in self.counters.values_mut() {
			counter.normalize();
		}
	}

	/// Known contexts (arbitrary order).
	pub fn contexts(&self) -> impl Iterator<Item = &C> {
		self.counters.keys()
	}

	/// Iterates over `(context, counter)` pairs (arbitrary order).
	pub fn iter(&self) -> impl Iterator<Item = (&C, &FrequencyCounter<K>)> {
		self.counters.iter()
	}

	/// Number of known contexts.
	pub fn len(&self) -> usize {
		self.counters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counters.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use float_cmp::approx_eq;

	type Counter = ConditionalFrequencyCounter<Vec<String>, String>;

	fn context(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|token| (*token).to_owned()).collect()
	}

	#[test]
	fn contexts_are_created_lazily() {
		let mut counter = Counter::new();
		assert!(counter.is_empty());

		counter.increment_count(context(&["a"]), "b".to_owned(), 1.0);
		counter.increment_count(context(&["a"]), "c".to_owned(), 1.0);

		assert_eq!(counter.len(), 1);
		assert_eq!(counter.get_count(context(&["a"]).as_slice(), "b"), 1.0);
		assert!(counter.get_counter(context(&["z"]).as_slice()).is_none());
	}

	#[test]
	fn unknown_context_reads_as_zero() {
		let mut counter = Counter::new();
		counter.increment_count(context(&["a"]), "b".to_owned(), 1.0);

		assert_eq!(counter.get_count(context(&["nope"]).as_slice(), "b"), 0.0);
		assert_eq!(counter.get_count(context(&["a"]).as_slice(), "nope"), 0.0);
	}

	#[test]
	fn normalize_is_per_context() {
		let mut counter = Counter::new();
		counter.increment_count(context(&["a"]), "x".to_owned(), 3.0);
		counter.increment_count(context(&["a"]), "y".to_owned(), 1.0);
		counter.increment_count(context(&["b"]), "x".to_owned(), 10.0);
		counter.normalize();

		assert!(approx_eq!(f64, counter.get_count(context(&["a"]).as_slice(), "x"), 0.75, ulps = 2));
		assert!(approx_eq!(f64, counter.get_count(context(&["a"]).as_slice(), "y"), 0.25, ulps = 2));
		assert!(approx_eq!(f64, counter.get_count(context(&["b"]).as_slice(), "x"), 1.0, ulps = 2));
		for (_, sub_counter) in counter.iter() {
			assert!(approx_eq!(f64, sub_counter.total(), 1.0, epsilon = 1e-9));
		}
	}

	#[test]
	fn structured_contexts_do_not_collide() {
		let mut counter = Counter::new();
		counter.increment_count(context(&["ab", "c"]), "x".to_owned(), 1.0);
		counter.increment_count(context(&["a", "bc"]), "y".to_owned(), 1.0);

		assert_eq!(counter.len(), 2);
		assert_eq!(counter.get_count(context(&["ab", "c"]).as_slice(), "y"), 0.0);
		assert_eq!(counter.get_count(context(&["a", "bc"]).as_slice(), "x"), 0.0);
	}
}
