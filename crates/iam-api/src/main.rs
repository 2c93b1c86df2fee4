//! IAM API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p iam-api
//! ```
//!
//! Configuration is loaded from environment variables (with .env support).

use iam_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration before tracing so the environment can pick the
    // log format
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config = if config.app.env.is_production() {
        TracingConfig::production()
    } else {
        TracingConfig::development()
    };
    if let Err(e) = try_init_tracing(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.server.port,
        "Starting IAM API server"
    );

    // Run the server
    if let Err(e) = iam_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
