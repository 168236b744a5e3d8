use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use weather_assistant_api::Server;
use weather_assistant_core::{Assistant, Config};

#[derive(Debug, Parser)]
#[command(name = "weather-assistant-api", version, about = "Weather Assistant HTTP API")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "WEATHER_ASSISTANT_BIND", default_value = "127.0.0.1:8000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Keep serving without an assistant so /health and /chat can report it.
    let assistant = match Config::load().and_then(|cfg| Assistant::from_config(&cfg)) {
        Ok(assistant) => {
            info!("WeatherAssistant initialized successfully");
            Some(assistant)
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize WeatherAssistant");
            None
        }
    };

    Server::new(assistant).run(&args.bind).await
}
