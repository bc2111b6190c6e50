//! HTTP surface: HTML dashboard, JSON views, CSV export, health and metrics.

pub mod handlers;
pub mod router;
pub mod templates;

use std::sync::Arc;
use tracing::info;

use crate::app::DashboardUseCase;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardUseCase>,
}

impl AppState {
    pub fn new(dashboard: DashboardUseCase) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

pub use router::app_router;

/// Bind `0.0.0.0:port` and serve until the process is stopped.
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = app_router(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Dashboard listening on {} (visit http://127.0.0.1:{})", bind_addr, port);
    axum::serve(listener, app).await?;
    Ok(())
}
