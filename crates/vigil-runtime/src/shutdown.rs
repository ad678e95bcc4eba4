//! Graceful shutdown with signal handling

use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;

/// Shutdown signal shared between the signal handler and the server
///
/// Triggering is sticky: waiters that subscribe after the trigger return
/// immediately.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Trigger shutdown
    pub fn trigger(&self) {
        self.sender.send_replace(true);
        tracing::info!("Shutdown signal triggered");
    }

    /// Check if shutdown was triggered
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until shutdown is triggered
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so this only returns once triggered.
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal handler for OS signals
#[derive(Debug)]
pub struct SignalHandler {
    signal: ShutdownSignal,
}

impl SignalHandler {
    /// Create a new signal handler
    pub fn new(signal: ShutdownSignal) -> Self {
        Self { signal }
    }

    /// Wait for SIGINT or SIGTERM, then trigger shutdown
    pub async fn run(self) {
        #[cfg(unix)]
        {
            use signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) =
                match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                    (Ok(term), Ok(int)) => (term, int),
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::error!("Failed to install signal handlers: {}", e);
                        return;
                    }
                };

            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM");
                    self.signal.trigger();
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT");
                    self.signal.trigger();
                }
            }
        }

        #[cfg(not(unix))]
        {
            match signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C");
                    self.signal.trigger();
                }
                Err(err) => {
                    tracing::error!("Failed to listen for Ctrl+C: {}", err);
                }
            }
        }
    }
}
