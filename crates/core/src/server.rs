use crate::api::{build_router, AppState};
use crate::config::ServerConfig;
use crate::emotion::Classifier;
use axum::Router;
use tokio::net::TcpListener;

const LOG_TARGET: &str = "server";

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, classifier: Classifier) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let app = build_router(AppState::new(classifier, config.max_text_chars));
    run(listener, app).await
}

/// Serves `app` on an already bound listener until Ctrl-C.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    if let Ok(local) = listener.local_addr() {
        tracing::info!(target: LOG_TARGET, "listening on http://{local}");
        tracing::info!(target: LOG_TARGET, "health check: http://{local}/health");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!(target: LOG_TARGET, "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(target: LOG_TARGET, "shutdown signal received"),
        Err(e) => {
            tracing::warn!(target: LOG_TARGET, "cannot listen for ctrl-c, running until killed: {e}");
            std::future::pending::<()>().await;
        }
    }
}
