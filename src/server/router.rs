use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::server::handlers::{
    dashboard_json, export_csv, health, index, metrics, report_json, series_json,
};
use crate::server::AppState;

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(dashboard_json))
        .route("/api/series", get(series_json))
        .route("/api/report", get(report_json))
        .route("/api/export.csv", get(export_csv))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(cors)
        .with_state(state)
}
