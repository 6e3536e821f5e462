//! Termination Signal Handling
//!
//! The agent stays registered until the process is told to stop; this module
//! provides the wait that gates deregistration.

/// Wait until the process receives Ctrl+C or SIGTERM.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, deregistering");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, deregistering");
        }
    }
}
