//! Searchlight HTTP server and CLI

use clap::Parser;
use searchlight::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    metrics::Metrics,
    service::SearchAssistant,
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { output }) => {
            let template = generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    eprintln!("Configuration template written to {}", path);
                }
                None => print!("{}", template),
            }
            Ok(())
        }
        Some(Command::Enhance { query }) => {
            let config = load_config(&cli.config)?;
            telemetry::init(&config.observability.log_level);
            let assistant = build_assistant(&config)?;
            let result = assistant.enhance_search_query(&query).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Some(Command::Serve) | None => serve(&cli.config).await,
    }
}

/// Load the config file, falling back to defaults when it does not exist
fn load_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    if std::path::Path::new(path).exists() {
        Ok(Config::from_file(path)?)
    } else {
        let mut config = Config::default();
        config.apply_api_key_override(std::env::var(searchlight::config::API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }
}

fn build_assistant(config: &Config) -> Result<SearchAssistant, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    Ok(SearchAssistant::from_config(config, metrics)?)
}

async fn serve(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    telemetry::init(&config.observability.log_level);

    if !std::path::Path::new(config_path).exists() {
        tracing::warn!(
            path = config_path,
            "Configuration file not found, using defaults"
        );
    }

    let assistant = build_assistant(&config)?.launch();
    let state = AppState::new(Arc::new(config.clone()), assistant);
    let app = handlers::app(state);

    let addr = config.server.socket_addr()?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check available at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
