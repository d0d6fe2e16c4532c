use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = karat_loader::Args::parse();
	karat_loader::run(args).await
}
