use std::env;

use log::info;
use quadgram_core::io;
use quadgram_core::model::{LanguageModel, QuadgramLanguageModel};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=quadgram_core=warn shows unknown words while scoring
    env_logger::init();

    // Usage: quadgram-example [TRAIN] [TEST]
    let mut args = env::args().skip(1);
    let train_path = args.next().unwrap_or_else(|| "./data/train.txt".to_owned());
    let test_path = args.next().unwrap_or_else(|| "./data/test.txt".to_owned());

    // One sentence per line, tokens separated by whitespace
    let train = io::read_corpus(&train_path)?;
    let test = io::read_corpus(&test_path)?;
    info!("Loaded {} training and {} test sentences", train.len(), test.len());

    // Train with the default interpolation weights (0.65 / 0.20 / 0.10 / 0.05)
    let model = QuadgramLanguageModel::new(&train);
    println!("Vocabulary size: {}", model.vocabulary_size());

    // Score every held-out sentence
    for sentence in &test {
        println!(
            "{:>12.6e}  {:>10.4}  {}",
            model.sentence_probability(sentence),
            model.sentence_log_probability(sentence),
            sentence.join(" ")
        );
    }
    println!("Test perplexity: {:.4}", model.perplexity(&test));

    // A fixed QUADGRAM_SEED makes the generated sentences reproducible
    let mut rng = match env::var("QUADGRAM_SEED") {
        Ok(seed) => StdRng::seed_from_u64(seed.parse()?),
        Err(_) => StdRng::from_os_rng(),
    };

    // Generate 10 sentences
    for i in 0..10 {
        println!("Generated sentence {}: {}", i + 1, model.generate_sentence(&mut rng).join(" "));
    }

    Ok(())
}
