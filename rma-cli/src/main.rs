use clap::Parser;

use rma_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    rma_cli::logging::init(cli.verbose);
    rma_cli::run(cli).await
}
