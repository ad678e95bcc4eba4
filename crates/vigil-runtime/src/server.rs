//! `/health` report server

use crate::shutdown::ShutdownSignal;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use vigil_core::{AggregateReport, Error, Result};
use vigil_health::StatusStore;

/// Build the report router
pub fn build_router(store: StatusStore) -> Router {
    Router::new()
        .route("/health", get(health_report))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// `GET /health`: snapshot the store and roll it up
///
/// Always 200; degraded health shows in the body only.
pub async fn health_report(State(store): State<StatusStore>) -> Json<AggregateReport> {
    Json(AggregateReport::from_records(store.get_all()))
}

/// Bound report server, ready to serve
#[derive(Debug)]
pub struct ReportServer {
    listener: TcpListener,
    router: Router,
}

impl ReportServer {
    /// Bind the listen address (`host:port`), resolving host names on the runtime
    pub async fn bind(addr: &str, store: StatusStore) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Runtime(format!("Failed to bind to {addr}: {e}")))?;

        Ok(Self {
            listener,
            router: build_router(store),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until shutdown is triggered
    pub async fn serve(self, shutdown: ShutdownSignal) -> Result<()> {
        let addr = self.local_addr()?;
        tracing::info!(listen = %addr, "HTTP server listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
