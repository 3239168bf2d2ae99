use std::sync::Arc;

use anyhow::anyhow;
use dotenvy::dotenv;
use tracing::{info, warn};

mod config;
mod relay;
mod store;
mod studio;
mod types;
mod ui;
mod utils;

use config::CONFIG;
use relay::{router, HttpUpstream, RelayState, GENERATE_IMAGE_PATH};
use store::{HistoryStore, SqliteStore};
use studio::{ProxyClient, Studio};
use utils::logging::init_logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Serve,
    Studio,
}

impl Mode {
    /// Base name of the general log files, so the relay and the studio never
    /// share a rolling file.
    fn log_name(self) -> &'static str {
        match self {
            Mode::Serve => "relay",
            Mode::Studio => "studio",
        }
    }
}

fn usage() -> &'static str {
    "Usage: ai_image_studio [serve|studio]\n  serve   run the image generation relay (default)\n  studio  open the interactive studio against PROXY_URL"
}

fn parse_mode(args: &[String]) -> anyhow::Result<Mode> {
    match args.get(1).map(|value| value.as_str()) {
        None | Some("serve") => Ok(Mode::Serve),
        Some("studio") => Ok(Mode::Studio),
        Some("--help") | Some("-h") => Err(anyhow!(usage())),
        Some(other) => Err(anyhow!("Unknown argument: {other}\n{}", usage())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let mode = match parse_mode(&args) {
        Ok(mode) => mode,
        Err(err) => {
            println!("{err}");
            return Ok(());
        }
    };

    // The studio owns the terminal, so its logs only go to files.
    let _guards = init_logging(
        &CONFIG.log_dir,
        mode.log_name(),
        &CONFIG.log_level,
        mode == Mode::Serve,
    );

    match mode {
        Mode::Serve => run_server().await,
        Mode::Studio => run_studio().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    CONFIG.warn_on_missing_credentials();

    let state = Arc::new(RelayState {
        upstream: Arc::new(HttpUpstream::new(CONFIG.upstream.clone())),
        default_model: CONFIG.upstream.default_model.clone(),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(CONFIG.bind_address).await?;
    info!(
        "Image relay listening on http://{}{}",
        listener.local_addr()?,
        GENERATE_IMAGE_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Image relay stopped");
    Ok(())
}

async fn run_studio() -> anyhow::Result<()> {
    let backend = SqliteStore::init(&CONFIG.database_url).await?;
    backend.health_check().await?;
    let history = HistoryStore::new(Arc::new(backend));
    let client = ProxyClient::new(CONFIG.proxy_url.clone());
    info!("Starting studio against {}", CONFIG.proxy_url);

    let studio = Studio::load(history, Arc::new(client), CONFIG.progress_interval).await;
    studio::terminal::run(studio, &CONFIG.download_dir).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!("Failed to install SIGTERM handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn serve_is_the_default_mode() {
        assert_eq!(parse_mode(&args(&["bin"])).unwrap(), Mode::Serve);
        assert_eq!(parse_mode(&args(&["bin", "serve"])).unwrap(), Mode::Serve);
        assert_eq!(parse_mode(&args(&["bin", "studio"])).unwrap(), Mode::Studio);
    }

    #[test]
    fn each_mode_logs_to_its_own_files() {
        assert_eq!(Mode::Serve.log_name(), "relay");
        assert_eq!(Mode::Studio.log_name(), "studio");
    }

    #[test]
    fn help_and_unknown_arguments_print_usage() {
        assert!(parse_mode(&args(&["bin", "--help"]))
            .unwrap_err()
            .to_string()
            .starts_with("Usage:"));
        let err = parse_mode(&args(&["bin", "bogus"])).unwrap_err().to_string();
        assert!(err.contains("Unknown argument: bogus"));
    }
}
