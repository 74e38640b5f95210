pub mod handlers;

pub use handlers::*;

use crate::service::ExportService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 构建路由
pub fn router(service: Arc<ExportService>) -> Router {
    let export_routes = Router::new()
        .route("/api/export", post(export))
        .route("/api/check", post(check))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(export_routes)
        .layer(ServiceBuilder::new())
}
