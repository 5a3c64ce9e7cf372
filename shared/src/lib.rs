// ============================================================================
// Message Store Service - Shared Library
// ============================================================================
//
// Everything between the HTTP listener and the storage adapter:
// - clients: session, policy and user-directory collaborators
// - gate: group/message authorization, fail-closed
// - validation: required-field checks for writes
// - names: concurrent display-name lookups for thread listings
// - status: up/down registry of backing services
// - routes: axum router, extractors and handlers
//
// ============================================================================

pub mod clients;
pub mod context;
pub mod gate;
pub mod names;
pub mod routes;
pub mod status;
pub mod utils;
pub mod validation;

pub use context::ServiceContext;

/// Resolves when the process receives ctrl-c or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install ctrl-c handler");
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

    tracing::info!("Shutdown signal received, draining connections");
}
