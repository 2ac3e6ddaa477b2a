use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ditto_imagine::relay::http::{RelayHttpState, router};
use ditto_imagine::{Env, OpenAICompatibleImages, Relay, RelayConfig};

#[derive(Parser, Debug)]
#[command(name = "ditto-imagine-relay")]
#[command(about = "Serve POST /api/generate, relaying prompts to the image provider")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dotenv file consulted before the process environment
    #[arg(long)]
    dotenv: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(long, visible_alias = "addr")]
    listen: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_ref() {
        Some(path) => RelayConfig::load(path)?,
        None => RelayConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if cli.json_logs {
        config.json_logs = true;
    }

    ditto_imagine::observability::init_tracing("info", config.json_logs)?;

    let env = match cli.dotenv.as_ref() {
        Some(path) => Env::from_dotenv_file(path)?,
        None => Env::default(),
    };

    let images = OpenAICompatibleImages::from_config(&config.provider, &env)?;
    tracing::info!(base_url = images.base_url(), "image provider configured");

    let relay = Relay::new(Arc::new(images));
    tracing::info!(model = %relay.preset().model, "generation preset loaded");

    let app = router(RelayHttpState::new(relay));
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!(listen = %config.listen, "ditto-imagine-relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
