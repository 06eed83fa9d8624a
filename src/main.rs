//! Application entry point for the `waterwatch` dashboard backend.
//!
//! This binary orchestrates the startup sequence for the dashboard API:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Connecting the configured reading store (Firebase, PostgreSQL or memory)
//! - Creating the database schema when PostgreSQL is used
//! - Building the optional summarizer client
//! - Mounting all API routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving until Ctrl-C
//!
//! See `config.rs` for the environment variables read at startup. Logging is
//! controlled by `RUST_LOG` or `AXUM_LOG_LEVEL`, plus `AXUM_SPAN_EVENTS` and
//! `FORCE_COLOR`.
use std::{env, net::SocketAddr, time::Duration};

use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use waterwatch::{
    config, schema, AppState, Config, FirebaseStore, MemoryStore, PgStore, ReadingSource,
    SourceConfig, Summarizer,
};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(cfg.http_timeout_secs)))
        .build()?;

    let source = connect_source(&cfg, client.clone()).await?;
    let summarizer = cfg.gemini_api_key.as_deref().map(|key| {
        let summarizer = Summarizer::new(client.clone(), key, &cfg.gemini_model);
        match cfg.gemini_base_url.as_deref() {
            Some(url) => summarizer.with_base_url(url),
            None => summarizer,
        }
    });

    // Build app from routes gateway (EMBP)
    let app: Router = waterwatch::router(AppState { source, summarizer });

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

// ---

/// Open the configured reading store.
async fn connect_source(cfg: &Config, client: reqwest::Client) -> Result<ReadingSource> {
    // ---
    let source = match &cfg.source {
        SourceConfig::Firebase { url, path } => {
            ReadingSource::Firebase(FirebaseStore::new(client, url, path))
        }
        SourceConfig::Postgres { db_url, pool_max } => {
            tracing::info!("Attempting to connect to database");

            let pool = PgPoolOptions::new()
                .max_connections(*pool_max)
                .connect(db_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

            tracing::info!("Successfully connected to database");
            schema::create_schema(&pool).await?;
            ReadingSource::Postgres(PgStore::new(pool))
        }
        SourceConfig::Memory => {
            tracing::warn!("Using in-memory reading store; no readings will be available");
            ReadingSource::Memory(MemoryStore::default())
        }
    };
    Ok(source)
}

/// Resolve when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `AXUM_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by `RUST_LOG`, else the `AXUM_LOG_LEVEL` env var
///
/// Called once at startup before any logging macros are invoked.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn,hyper=info,reqwest=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
