//! Wiring the scheduler and the report server together

use crate::server::ReportServer;
use crate::shutdown::ShutdownSignal;
use std::sync::Arc;
use vigil_config::AppConfig;
use vigil_core::Result;
use vigil_health::{
    cleanup_logs, EventSink, FileEventLog, NullEventLog, Prober, Scheduler, StatusStore,
};

/// The running health monitor
#[derive(Debug)]
pub struct Runtime {
    config: AppConfig,
    store: StatusStore,
    sink: Arc<dyn EventSink>,
    shutdown: ShutdownSignal,
}

impl Runtime {
    /// Create a runtime that records probe events into `sink`
    pub fn new(config: AppConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            store: StatusStore::new(),
            sink,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Create a runtime with the event log described by the configuration
    ///
    /// Opens the daily log in `log_directory` (after pruning files past the
    /// retention window), or discards events when no directory is set.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let sink: Arc<dyn EventSink> = match &config.log_directory {
            Some(directory) => {
                let log = FileEventLog::open(directory)?;
                cleanup_logs(log.directory(), config.log_retention_days);
                Arc::new(log)
            }
            None => {
                tracing::info!("No log_directory configured; probe events will not be persisted");
                Arc::new(NullEventLog)
            }
        };

        Ok(Self::new(config, sink))
    }

    /// Store shared by the scheduler and the server
    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    /// Configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Signal that stops the server
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Bind the configured listen address
    pub async fn bind(&self) -> Result<ReportServer> {
        ReportServer::bind(&self.config.bind_address(), self.store.clone()).await
    }

    /// Start probing and serve on an already bound server until shutdown
    pub async fn serve(&self, server: ReportServer) -> Result<()> {
        let prober = Prober::new(self.store.clone(), Arc::clone(&self.sink));
        let scheduler = Scheduler::new(
            self.config.components.clone(),
            self.config.check_interval(),
            prober,
        )
        .spawn();

        let result = server.serve(self.shutdown.clone()).await;

        scheduler.abort();
        result
    }

    /// Bind, start probing, and serve until shutdown
    pub async fn run(&self) -> Result<()> {
        let server = self.bind().await?;
        self.serve(server).await
    }
}
