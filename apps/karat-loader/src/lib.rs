pub mod error;
pub mod loader;

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use karat_chunking::ChunkingConfig;
use karat_storage::QdrantIndex;

#[derive(Debug, Parser)]
#[command(
	version = karat_cli::VERSION,
	rename_all = "kebab",
	styles = karat_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = karat_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let Some(corpus) = config.corpus else {
		return Err(eyre::eyre!("Config is missing the [corpus] section required by the loader."));
	};
	let index = QdrantIndex::new(&config.storage.qdrant)?;

	index.ensure_collections().await?;

	let state = loader::LoaderState {
		index,
		embedding: config.providers.embedding,
		chunking: ChunkingConfig {
			max_chars: config.chunking.max_chars,
			overlap_chars: config.chunking.overlap_chars,
		},
		corpus,
	};

	loader::run_loader(state).await?;

	Ok(())
}
