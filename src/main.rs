use anyhow::Result;
use aurashow::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    aurashow::run(cli).await
}
