use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// Splits a line into word tokens on Unicode whitespace.
pub fn tokenize(line: &str) -> Vec<String> {
	line.split_whitespace().map(str::to_owned).collect()
}

/// Reads a corpus file and returns its tokenized sentences.
///
/// - One sentence per line (`\n` / `\r\n`)
/// - Tokens are separated by whitespace
/// - Blank lines are skipped
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<Vec<String>>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.map(tokenize)
		.filter(|sentence| !sentence.is_empty())
		.collect())
}

/// Returns the file name without its extension.
///
/// Examples:
/// - `"./data/train.txt"` → `"train"`
/// - `"train.txt"` → `"train"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn tokenize_splits_on_whitespace() {
		assert_eq!(tokenize("  the cat\tsat \r"), vec!["the", "cat", "sat"]);
		assert!(tokenize("   ").is_empty());
	}

	#[test]
	fn get_filename_strips_extension() {
		assert_eq!(get_filename("./data/train.txt").unwrap(), "train");
		assert_eq!(get_filename("train").unwrap(), "train");
	}

	#[test]
	fn read_corpus_and_list_files() {
		let dir = env::temp_dir().join(format!("quadgram-io-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("b.txt"), "the cat sat\r\n\nthe dog ran\n").unwrap();
		fs::write(dir.join("a.txt"), "").unwrap();
		fs::write(dir.join("notes.md"), "ignored").unwrap();

		let corpus = read_corpus(dir.join("b.txt")).unwrap();
		assert_eq!(corpus, vec![vec!["the", "cat", "sat"], vec!["the", "dog", "ran"]]);
		assert_eq!(list_files(&dir, "txt").unwrap(), vec!["a.txt", "b.txt"]);

		fs::remove_dir_all(&dir).unwrap();
	}
}
