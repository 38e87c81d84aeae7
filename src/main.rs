use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use damoang_auth::api::system::{SERVICE_NAME, SERVICE_VERSION};
use damoang_auth::config::Config;
use damoang_auth::AppState;

#[derive(Parser, Debug)]
#[command(name = "damoang-auth")]
#[command(author, version, about = "Damoang authentication service", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "damoang-auth.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Allowed CORS origins, comma separated (`*` for any)
    #[arg(long, env = "CORS_ALLOW_ORIGINS", value_delimiter = ',')]
    cors_origins: Option<Vec<String>>,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    /// Flags and environment win over the config file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origins) = &self.cors_origins {
            config.cors.allowed_origins = origins.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so PORT and friends can come from .env
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.cors.validate()?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        tracing::warn!(error = %e, "No .env file loaded, using process environment only");
    }

    tracing::info!("Starting Damoang {} service v{}", SERVICE_NAME, SERVICE_VERSION);

    let port = config.server.port;
    let api_addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));
    let app = damoang_auth::api::create_app(state)?;

    let listener = match bind(&api_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %api_addr, error = %format!("{e:#}"), "Failed to bind API server");
            std::process::exit(1);
        }
    };

    tracing::info!("API server listening on http://{}", api_addr);
    tracing::info!("Health check: http://localhost:{}/health", port);
    tracing::info!("API index: http://localhost:{}/api/v1/auth", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(port: Option<u16>, cors_origins: Option<Vec<String>>) -> Cli {
        Cli {
            config: PathBuf::from("damoang-auth.toml"),
            port,
            cors_origins,
            log_level: None,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "damoang-auth",
            "--port",
            "9001",
            "--cors-origins",
            "https://a.example,https://b.example",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.port, 9001);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.cors.validate().is_ok());
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let mut config: Config = toml::from_str(
            r#"
            [server]
            port = 7000

            [cors]
            allowed_origins = ["https://app.example"]
            "#,
        )
        .unwrap();

        cli(None, None).apply_overrides(&mut config);

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.cors.allowed_origins, vec!["https://app.example"]);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["damoang-auth", "--port", "not-a-port"]).is_err());
        assert!(Cli::try_parse_from(["damoang-auth", "--port", "70000"]).is_err());
    }

    #[tokio::test]
    async fn test_bind_fails_when_address_is_taken() {
        let held = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = held.local_addr().unwrap().to_string();

        let err = bind(&addr).await.unwrap_err();
        assert!(err.to_string().contains(&addr));
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_address() {
        assert!(bind("not an address").await.is_err());
    }
}
