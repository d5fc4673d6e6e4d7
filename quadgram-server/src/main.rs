use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use quadgram_core::io::{get_filename, list_files, read_corpus, tokenize};
use quadgram_core::model::{Interpolation, LanguageModel, ModelConfig, QuadgramLanguageModel};

/// Extension of the corpus files served from the data directory.
const CORPUS_EXTENSION: &str = "txt";

/// Upper bound of `count` for `/v1/generate`.
const MAX_GENERATED: usize = 100;

/// Query parameters for the `/v1/score` endpoint
#[derive(Deserialize)]
struct ScoreParams {
	sentence: Option<String>,
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	seed: Option<u64>,
	count: Option<usize>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
	lambdas: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ScoreResponse {
	tokens: Vec<String>,
	probability: f64,
	log_probability: f64,
}

struct SharedData {
	model: QuadgramLanguageModel,
	corpus_names: Vec<String>,
}

/// Server configuration read from the environment.
struct ServerConfig {
	host: String,
	port: u16,
	data_dir: PathBuf,
}

impl ServerConfig {
	fn from_env() -> Result<Self, String> {
		let host = env::var("QUADGRAM_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
		let port = match env::var("QUADGRAM_PORT") {
			Ok(port) => port.parse::<u16>().map_err(|e| format!("Invalid QUADGRAM_PORT '{}': {}", port, e))?,
			Err(_) => 5000,
		};
		let data_dir = PathBuf::from(env::var("QUADGRAM_DATA").unwrap_or_else(|_| "./data".to_owned()));
		Ok(Self { host, port, data_dir })
	}
}

impl CorpusQuery {
	/// Reads the interpolation weights, the defaults if none are given.
	fn config(&self) -> Result<ModelConfig, String> {
		match &self.lambdas {
			None => Ok(ModelConfig::default()),
			Some(s) => Ok(ModelConfig::with_interpolation(Interpolation::parse(s)?)),
		}
	}
}

/// Trains a new model on the named corpora of `data_dir`.
fn train_model(data_dir: &Path, names: &[String], config: ModelConfig) -> Result<QuadgramLanguageModel, String> {
	let mut sentences = Vec::new();
	for name in names {
		let corpus_path = data_dir.join(format!("{}.{}", name, CORPUS_EXTENSION));
		let corpus = read_corpus(&corpus_path)
			.map_err(|e| format!("Failed to read corpus '{}': {}", corpus_path.display(), e))?;
		sentences.extend(corpus);
	}
	Ok(QuadgramLanguageModel::with_config(&sentences, config))
}

/// HTTP GET endpoint `/v1/score`
///
/// Tokenizes `sentence` on whitespace and returns its probability and log
/// probability under the current model, as JSON.
#[get("/v1/score")]
async fn get_score(data: web::Data<RwLock<SharedData>>, query: web::Query<ScoreParams>) -> impl Responder {
	let tokens = match &query.sentence {
		Some(s) => tokenize(s),
		None => return HttpResponse::BadRequest().body("Missing sentence"),
	};

	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let response = ScoreResponse {
		probability: shared_data.model.sentence_probability(&tokens),
		log_probability: shared_data.model.sentence_log_probability(&tokens),
		tokens,
	};
	HttpResponse::Ok().json(response)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` sentences (default 1), one per line. A `seed` makes the
/// output reproducible.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count == 0 || count > MAX_GENERATED {
		return HttpResponse::BadRequest().body(format!("count must be between 1 and {}", MAX_GENERATED));
	}

	let mut rng = match query.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let sentences: Vec<String> = (0..count)
		.map(|_| shared_data.model.generate_sentence(&mut rng).join(" "))
		.collect();
	HttpResponse::Ok().body(sentences.join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(config: web::Data<ServerConfig>) -> impl Responder {
	match list_files(&config.data_dir, CORPUS_EXTENSION) {
		Ok(files) => {
			let names: Vec<String> = files.iter().filter_map(|file| get_filename(file).ok()).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpus_names.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_corpora`
///
/// Trains a new model on the comma separated corpus `names` and replaces the
/// current one. Training happens outside the lock; readers keep using the
/// previous model until the swap.
#[put("/v1/load_corpora")]
async fn put_corpora(
	data: web::Data<RwLock<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();
	if corpus_names.is_empty() {
		return HttpResponse::BadRequest().body("Missing or empty corpus name");
	}

	let model_config = match query.config() {
		Ok(c) => c,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	// Reading and training run on the blocking pool, not on the worker
	let data_dir = config.data_dir.clone();
	let names = corpus_names.clone();
	let model = match web::block(move || train_model(&data_dir, &names, model_config)).await {
		Ok(Ok(m)) => m,
		Ok(Err(e)) => {
			warn!("{}", e);
			return HttpResponse::InternalServerError().body(e);
		}
		Err(e) => {
			warn!("Training task failed: {}", e);
			return HttpResponse::InternalServerError().body("Training failed");
		}
	};

	let mut shared_data = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;
	shared_data.corpus_names = corpus_names;
	info!("Loaded corpora: {}", shared_data.corpus_names.join(", "));

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with a model trained on an empty corpus, wraps it in a `RwLock`
/// so concurrent requests can score in parallel, and starts an Actix-web
/// HTTP server.
///
/// # Notes
/// - Binds to `QUADGRAM_HOST:QUADGRAM_PORT` (default 127.0.0.1:5000).
/// - Corpora are read from `QUADGRAM_DATA` (default `./data`).
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	let bind = (config.host.clone(), config.port);
	info!("Serving corpora from {} on {}:{}", config.data_dir.display(), bind.0, bind.1);

	let shared_data = SharedData {
		model: QuadgramLanguageModel::new(Vec::<Vec<String>>::new()),
		corpus_names: Vec::new(),
	};
	let shared_model = web::Data::new(RwLock::new(shared_data));
	let server_config = web::Data::new(config);

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.app_data(server_config.clone())
			.service(get_score)
			.service(get_generated)
			.service(get_corpora)
			.service(get_loaded_corpora)
			.service(put_corpora)
	})
		.bind(bind)?
		.run()
		.await
}
