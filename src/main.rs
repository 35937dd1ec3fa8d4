use agrocare_ai::config::Config;
use agrocare_ai::server;
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "agrocare-ai")]
#[command(about = "AI backend for plant disease detection and farming advice")]
struct CliArgs {
    /// Address to bind, overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT.
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrocare_ai=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Starting agrocare-ai on {}:{}", config.host, config.port);

    if let Err(e) = server::serve(config).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
