use anyhow::Result;
use clap::Parser;
use tokio::signal;

use oppindex::Cli;
use oppindex::cli::run::handle_run;

#[tokio::main]
async fn main() -> Result<()> {
    // API keys and region may come from a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tokio::select! {
        result = handle_run(cli) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, aborting run...");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
