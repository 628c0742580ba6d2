use bikeshare_analytics::cli::{run, Cli};
use bikeshare_analytics::utils::init_logging;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli).await?;
    Ok(())
}
