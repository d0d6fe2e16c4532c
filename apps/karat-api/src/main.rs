use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = karat_api::Args::parse();
	karat_api::run(args).await
}
