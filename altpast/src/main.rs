#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod reimagine;

use altpast_config::Config;
use altpast_server::Server;
use args::{Args, Command};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let from_file = args.config.exists();
    let config = load_config(&args)?;

    let _telemetry_guard = altpast_telemetry::init(config.telemetry.as_ref(), "info")?;

    if from_file {
        tracing::info!(config_path = %args.config.display(), "configuration loaded");
    } else {
        tracing::info!(
            config_path = %args.config.display(),
            "no configuration file, using defaults and environment credentials"
        );
    }

    match &args.command {
        Some(Command::Reimagine(reimagine_args)) => reimagine::run(&config, reimagine_args).await,
        Some(Command::Serve) | None => serve(&config).await,
    }
}

/// Read the configuration file if present and apply CLI overrides
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::from_env()
    };

    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    if args.development {
        config.server.development = true;
    }

    Ok(config)
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!("starting altpast");

    let server = Server::new(config)?;

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    server.serve(shutdown).await?;

    tracing::info!("altpast stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn cli_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten_address = \"127.0.0.1:4000\"").unwrap();

        let path = file.path().to_str().unwrap();
        let args = Args::try_parse_from(["altpast", "--config", path, "--listen", "127.0.0.1:5000", "--development"]).unwrap();

        let config = load_config(&args).unwrap();

        assert_eq!(config.server.listen_address, Some("127.0.0.1:5000".parse().unwrap()));
        assert!(config.server.development);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let args = Args::try_parse_from(["altpast", "--config", path.to_str().unwrap()]).unwrap();
        let config = load_config(&args).unwrap();

        assert_eq!(config.transcription.model, "whisper-1");
        assert!(!config.server.development);
    }
}
