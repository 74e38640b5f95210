use crate::error::ExportError;
use crate::models::{BatchEntry, ExportBatch};
use crate::service::{EntryCheck, ExportOutput, ExportService};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 版式 + 已识别的票据
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub layout: String,
    #[serde(default)]
    pub entries: Vec<BatchEntry>,
}

/// 核对请求体
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub entries: Vec<BatchEntry>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub message: String,
    pub files: Option<ExportOutput>,
    pub checks: Option<Vec<EntryCheck>>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub success: bool,
    pub message: String,
    pub checks: Vec<EntryCheck>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 导出接口
pub async fn export(
    State(service): State<Arc<ExportService>>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let batch = ExportBatch::new(req.entries);

    match service.export(&batch, &req.layout) {
        Ok(result) => {
            let response = ExportResponse {
                success: true,
                message: format!(
                    "Exported {} entries with layout {}",
                    batch.len(),
                    result.layout
                ),
                files: Some(result.files),
                checks: Some(result.checks),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let status = match &e {
                ExportError::UnknownLayout(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::error!("Export failed: {}", e);
            let response = ExportResponse {
                success: false,
                message: format!("Error: {}", e),
                files: None,
                checks: None,
            };
            (status, Json(response)).into_response()
        }
    }
}

/// 金额核对接口
pub async fn check(
    State(service): State<Arc<ExportService>>,
    Json(req): Json<CheckRequest>,
) -> Response {
    let batch = ExportBatch::new(req.entries);
    let checks = service.check(&batch);
    let failed = checks.iter().filter(|c| !c.check.ok).count();

    let response = CheckResponse {
        success: true,
        message: format!("Checked {} entries, {} mismatched", checks.len(), failed),
        checks,
    };
    (StatusCode::OK, Json(response)).into_response()
}
