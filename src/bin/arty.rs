use std::{process::ExitCode, sync::Arc};

use tracing_subscriber::EnvFilter;

use arty::{config::Config, provider::OpenAiProvider, server};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arty=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Invalid configuration: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let provider = match OpenAiProvider::new(&config) {
        Ok(provider) => Arc::new(provider),
        Err(error) => {
            tracing::error!("Failed to create provider client: {:#}", error);
            return ExitCode::FAILURE;
        }
    };

    match server::serve(config, provider).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
