use super::InvoiceRecord;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 批次中的一张票据
///
/// 识别失败或文件类型不支持时 `error` 有值, `record` 为空记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchEntry {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub record: InvoiceRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn extracted(filename: impl Into<String>, record: InvoiceRecord) -> Self {
        Self {
            filename: filename.into(),
            record,
            error: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            record: InvoiceRecord::default(),
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// 参与导出的记录: 失败条目一律视为空记录, 即使请求里带了 `record`
    pub fn effective_record(&self) -> Cow<'_, InvoiceRecord> {
        if self.is_failed() {
            Cow::Owned(InvoiceRecord::default())
        } else {
            Cow::Borrowed(&self.record)
        }
    }
}

/// 一次上传产生的有序批次
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportBatch {
    pub entries: Vec<BatchEntry>,
}

impl ExportBatch {
    pub fn new(entries: Vec<BatchEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
