use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, info_span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_responder::api::extract;
use api_responder::api::handlers::AppStateInner;
use api_responder::api::routes::create_router;
use api_responder::config::{Config, LogFormat};
use api_responder::responder::Responder;
use api_responder::store::NoteStore;

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Starting graceful shutdown...");
}

fn init_logging(format: LogFormat) {
    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_responder=debug".into()),
        )
        .with(text)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_logging(config.logging.format);

    info!("Starting API Responder v{}", env!("CARGO_PKG_VERSION"));
    info!(
        log_response_bodies = config.responder.log_response_bodies,
        "Configuration loaded successfully"
    );

    let responder = Responder::builder(info_span!("api"))
        .log_response_bodies(config.responder.log_response_bodies)
        .request_id_fn(Some(extract::request_id))
        .client_ip_fn(Some(extract::client_ip))
        .build();

    let state = Arc::new(AppStateInner::new(NoteStore::new(), responder));
    let app = create_router(state);

    // Start server
    let addr = config.server_address();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    info!("Server listening on {}", addr);

    // Serve with graceful shutdown; peer addresses feed the client IP fallback
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");

    Ok(())
}
