use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use quadgram_core::model::{LanguageModel, QuadgramLanguageModel};

thread_local! {
	/// Records logged by the current test thread.
	static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger keeping every record of the calling thread in `RECORDS`.
struct CapturingLogger;

impl Log for CapturingLogger {
	fn enabled(&self, _: &Metadata) -> bool {
		true
	}

	fn log(&self, record: &Record) {
		RECORDS.with(|records| records.borrow_mut().push((record.level(), record.args().to_string())));
	}

	fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT: Once = Once::new();

/// Installs the logger (once per test binary) and clears this thread's records.
fn capture() {
	INIT.call_once(|| {
		// Only fails if another logger is set, which nothing in this binary does
		let _ = log::set_logger(&LOGGER);
		log::set_max_level(LevelFilter::Trace);
	});
	RECORDS.with(|records| records.borrow_mut().clear());
}

fn warnings() -> Vec<String> {
	RECORDS.with(|records| {
		records
			.borrow()
			.iter()
			.filter(|(level, _)| *level == Level::Warn)
			.map(|(_, message)| message.clone())
			.collect()
	})
}

fn model() -> QuadgramLanguageModel {
	QuadgramLanguageModel::new([["the", "cat", "sat"], ["the", "dog", "sat"]])
}

#[test]
fn unknown_word_is_reported() {
	let model = model();
	capture();

	model.quadgram_probability("the", "cat", "sat", "zebra");

	let warnings = warnings();
	assert_eq!(warnings.len(), 1, "expected one warning, got {:?}", warnings);
	assert!(warnings[0].contains("zebra"), "unexpected warning: {}", warnings[0]);
}

#[test]
fn known_word_is_not_reported() {
	let model = model();
	capture();

	model.quadgram_probability("<S>", "<S>", "the", "cat");
	model.sentence_probability(&["the", "dog", "sat"]);

	assert!(warnings().is_empty(), "unexpected warnings: {:?}", warnings());
}

#[test]
fn every_unknown_token_of_a_sentence_is_reported() {
	let model = model();
	capture();

	model.sentence_probability(&["the", "zebra", "sat", "unicorn"]);

	let warnings = warnings();
	assert_eq!(warnings.len(), 2, "unexpected warnings: {:?}", warnings);
	assert!(warnings[0].contains("zebra"));
	assert!(warnings[1].contains("unicorn"));
}
