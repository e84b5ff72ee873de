//! Entry point wiring CLI dispatch to the analysis pipeline.

use anyhow::Result;
use tracing::info;
use wine_radar::{cli::Cli, config::Settings, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;
    let settings = Settings::load()?;

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
