//! OS signal handling.

/// Resolve once Ctrl-C (SIGINT) arrives.
///
/// Never resolves if the signal handler cannot be installed.
pub async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for interrupt: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
