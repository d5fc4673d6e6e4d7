use std::borrow::Borrow;
use std::collections::BTreeMap;

/// A mapping from a key to an accumulated, non-negative weight.
///
/// During training the weights are raw observation counts. Once
/// [`normalize`](FrequencyCounter::normalize) has been called, they form a
/// probability distribution over the keys.
///
/// ## Iteration order
/// Keys are stored and iterated in **sorted key order**. Sampling walks the
/// distribution in this order, so it is part of the sampling contract and
/// does not depend on the order in which observations were added.
///
/// ## Invariants
/// - Every weight is >= 0
/// - After normalization the weights sum to 1.0, or the counter is empty
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyCounter<K: Ord> {
	/// Accumulated weight per key.
	/// Example: { "a" => 2.0, "b" => 1.0 }
	weights: BTreeMap<K, f64>,
}

impl<K: Ord> Default for FrequencyCounter<K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Ord> FrequencyCounter<K> {
	/// Creates a new empty counter.
	pub fn new() -> Self {
		Self { weights: BTreeMap::new() }
	}

	/// Adds `amount` to the weight of `key`.
	///
	/// - If the key already exists, its weight is increased.
	/// - Otherwise, a new entry is created with `amount` as its weight.
	///
	/// Negative or non-finite amounts would break the counter invariants and
	/// are ignored.
	pub fn increment(&mut self, key: K, amount: f64) {
		if !(amount >= 0.0 && amount.is_finite()) {
			return;
		}
		*self.weights.entry(key).or_insert(0.0) += amount;
	}

	/// Returns the weight of `key`, or `0.0` if the key was never observed.
	pub fn get_count<Q>(&self, key: &Q) -> f64
	where
		K: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.weights.get(key).copied().unwrap_or(0.0)
	}

	/// Sum of all weights.
	pub fn total(&self) -> f64 {
		self.weights.values().sum()
	}

	/// Turns the counter into a probability distribution.
	///
	/// Every weight is divided by the total. An empty (or all-zero) counter
	/// is left untouched. Normalizing an already normalized counter is a
	/// no-op up to floating-point rounding.
	pub fn normalize(&mut self) {
		let total = self.total();
		if total <= 0.0 {
			return;
		}
		for weight in self.weights.values_mut() {
			*weight /= total;
		}
	}

	/// Known keys, in sorted key order.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.weights.keys()
	}

	/// `(key, weight)` pairs, in sorted key order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
		self.weights.iter().map(|(key, weight)| (key, *weight))
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.weights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.weights.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use float_cmp::approx_eq;
	use rstest::*;

	fn counter(entries: &[(&str, f64)]) -> FrequencyCounter<String> {
		let mut counter = FrequencyCounter::new();
		for (key, amount) in entries {
			counter.increment((*key).to_owned(), *amount);
		}
		counter
	}

	#[test]
	fn increment_accumulates_and_creates_entries() {
		let mut counter = counter(&[("a", 1.0), ("b", 2.5)]);
		counter.increment("a".to_owned(), 1.0);

		assert_eq!(counter.get_count("a"), 2.0);
		assert_eq!(counter.get_count("b"), 2.5);
		assert_eq!(counter.len(), 2);
	}

	#[test]
	fn missing_key_reads_as_zero() {
		let counter = counter(&[("a", 1.0)]);
		assert_eq!(counter.get_count("zzz"), 0.0);
	}

	#[test]
	fn negative_amount_is_ignored() {
		let mut counter = counter(&[("a", 1.0)]);
		counter.increment("a".to_owned(), -5.0);
		counter.increment("b".to_owned(), f64::NAN);

		assert_eq!(counter.get_count("a"), 1.0);
		assert!(!counter.keys().any(|key| key == "b"));
	}

	#[rstest(
		entries,
		case(vec![("a", 1.0)]),
		case(vec![("a", 2.0), ("b", 1.0), ("c", 1.0)]),
		case(vec![("x", 0.1), ("y", 0.2), ("z", 0.3), ("w", 1e6)])
	)]
	fn normalize_sums_to_one(entries: Vec<(&str, f64)>) {
		let mut counter = counter(&entries);
		let before = counter.clone();
		counter.normalize();

		assert!(
			approx_eq!(f64, counter.total(), 1.0, epsilon = 1e-9),
			"expected total 1.0, got {}",
			counter.total()
		);
		// Ratios are preserved
		let total = before.total();
		for (key, weight) in before.iter() {
			assert!(approx_eq!(f64, counter.get_count(key.as_str()), weight / total, epsilon = 1e-12));
		}
	}

	#[test]
	fn normalize_empty_counter_is_noop() {
		let mut counter: FrequencyCounter<String> = FrequencyCounter::new();
		counter.normalize();
		assert!(counter.is_empty());
		assert_eq!(counter.total(), 0.0);
	}

	#[test]
	fn normalize_all_zero_counter_is_noop() {
		let mut counter = counter(&[("a", 0.0), ("b", 0.0)]);
		counter.normalize();
		assert_eq!(counter.get_count("a"), 0.0);
		assert_eq!(counter.get_count("b"), 0.0);
	}

	#[test]
	fn normalize_twice_is_stable() {
		let mut counter = counter(&[("a", 3.0), ("b", 1.0), ("c", 7.0)]);
		counter.normalize();
		let once = counter.clone();
		counter.normalize();

		for (key, weight) in once.iter() {
			assert!(approx_eq!(f64, counter.get_count(key.as_str()), weight, epsilon = 1e-12));
		}
	}

	#[test]
	fn keys_are_sorted_regardless_of_insertion_order() {
		let counter = counter(&[("pear", 1.0), ("apple", 1.0), ("fig", 1.0)]);
		let keys: Vec<&str> = counter.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["apple", "fig", "pear"]);
	}
}
