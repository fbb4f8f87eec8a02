// Entrypoint for the CLI application: set up logging, build the client from
// the environment and hand it to the menu loop.

use grader_cli::{api::GraderClient, config::Config, ui::main_menu};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Quiet by default so log lines don't interleave with the menu.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let client = GraderClient::from_config(&config);

    main_menu(client).await?;
    Ok(())
}
