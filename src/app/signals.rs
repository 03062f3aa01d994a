//! OS interrupt handling for hosting processes.
//!
//! The orchestrator installs no signal handlers. A host binary that wants
//! Ctrl+C / SIGTERM handling spawns [`forward_interrupts`] with the run
//! context it was handed by the factory.

use super::ShutdownReason;
use crate::context::Context;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Translate interrupts into context cancellations.
///
/// The first interrupt cancels `run`, starting a graceful shutdown. A
/// second one cancels `host`, which asks the stopping service to hurry.
/// The returned task ends once `host` is done.
pub fn forward_interrupts(run: Context, host: Context) -> JoinHandle<()> {
    let (sender, receiver) = mpsc::channel(2);

    let listener_host = host.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = listener_host.done() => break,
                signal = next_interrupt() => {
                    if sender.send(signal).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    tokio::spawn(relay(run, host, receiver))
}

/// Apply interrupts arriving on `interrupts` to the run and host contexts
pub(crate) async fn relay(
    run: Context,
    host: Context,
    mut interrupts: mpsc::Receiver<&'static str>,
) {
    let Some(first) = next_or_host_done(&host, &mut interrupts).await else {
        return;
    };
    info!("Received {} - shutting down gracefully", first);
    run.cancel_with_cause(ShutdownReason::Signal(first.to_string()));

    let Some(second) = next_or_host_done(&host, &mut interrupts).await else {
        return;
    };
    warn!("Received {} again - forcing shutdown", second);
    host.cancel_with_cause(ShutdownReason::Forced(second.to_string()));
}

async fn next_or_host_done(
    host: &Context,
    interrupts: &mut mpsc::Receiver<&'static str>,
) -> Option<&'static str> {
    tokio::select! {
        _ = host.done() => None,
        signal = interrupts.recv() => signal,
    }
}

/// Wait for SIGINT (Ctrl+C) or, on unix, SIGTERM
async fn next_interrupt() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => "SIGINT",
                    _ = sigterm.recv() => "SIGTERM",
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {}", e);
                ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        "SIGINT"
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
