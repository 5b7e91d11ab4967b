//! Postguard - content moderation for social media posts.
//!
//! Runs the moderation HTTP API, or moderates a single post from the
//! command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use postguard_core::{ModerationConfig, ModerationCoordinator, RawModerationRequest};
use postguard_server::{Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Postguard - content moderation for social media posts
#[derive(Parser, Debug)]
#[command(name = "postguard", version, about)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Moderation config file (JSON)
    #[arg(long, global = true, env = "POSTGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind the API server to
    #[arg(long, global = true, env = "POSTGUARD_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the API server to
    #[arg(long, global = true, env = "POSTGUARD_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Moderate a single post and print the result as JSON
    Check {
        /// The post content
        content: String,

        /// Target platform
        #[arg(long, default_value = "twitter")]
        platform: String,

        /// Content type
        #[arg(long, default_value = "text")]
        content_type: String,
    },
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "postguard", "Postguard").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postguard={},warn", log_level)));

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("postguard")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                // Console goes to stderr so `check` output stays clean JSON
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

/// Load the moderation config, falling back to defaults when no file is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<ModerationConfig> {
    match path {
        Some(path) => ModerationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            tracing::debug!("No config file given, using defaults");
            Ok(ModerationConfig::default())
        }
    }
}

async fn serve(args: &Args, config: ModerationConfig) -> anyhow::Result<()> {
    let server_config = ServerConfig::default()
        .with_host(args.host.clone())
        .with_port(args.port);
    let server = Server::new(server_config, config)?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

/// Moderate one post and print the result. Returns false if the request
/// was rejected by validation.
fn check(
    config: ModerationConfig,
    content: String,
    platform: String,
    content_type: String,
) -> anyhow::Result<bool> {
    let coordinator = ModerationCoordinator::new(config);
    let request = RawModerationRequest {
        content,
        content_type,
        platform,
        ..Default::default()
    };

    match coordinator.moderate_raw(request) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(true)
        }
        Err(e) => {
            let body = serde_json::json!({ "error": e.to_string(), "code": e.code() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&args);

    tracing::debug!("Args: {:?}", args);

    let config = load_config(args.config.as_deref())?;

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting Postguard {}", env!("CARGO_PKG_VERSION"));
            serve(&args, config).await?;
            tracing::info!("Postguard shutting down");
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            content,
            platform,
            content_type,
        } => {
            if check(config, content, platform, content_type)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
