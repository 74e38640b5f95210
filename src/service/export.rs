use super::formatter::{format, ExportOutput, Layout};
use super::math_check::{check_batch, EntryCheck};
use crate::error::Result;
use crate::models::ExportBatch;

/// 导出结果: 各文件内容 + 每张票据的金额核对
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub layout: Layout,
    pub files: ExportOutput,
    pub checks: Vec<EntryCheck>,
}

/// 导出服务
pub struct ExportService {
    tolerance: f64,
}

impl ExportService {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// 按版式名称导出整批
    pub fn export(&self, batch: &ExportBatch, layout: &str) -> Result<ExportResult> {
        let layout: Layout = layout.parse()?;

        let failed = batch.entries.iter().filter(|e| e.is_failed()).count();
        if failed > 0 {
            tracing::warn!(
                "{} of {} entries failed extraction, exporting default lines for them",
                failed,
                batch.len()
            );
        }

        let files = format(batch, layout)?;
        let checks = self.check(batch);
        let mismatched = checks.iter().filter(|c| !c.check.ok).count();
        tracing::info!(
            "Export finished: layout {}, {} entries, {} math mismatches",
            layout,
            batch.len(),
            mismatched
        );

        Ok(ExportResult {
            layout,
            files,
            checks,
        })
    }

    pub fn check(&self, batch: &ExportBatch) -> Vec<EntryCheck> {
        check_batch(batch, self.tolerance)
    }
}
