use super::{layout_a, layout_b, layout_generic};
use crate::error::{ExportError, Result};
use crate::models::ExportBatch;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 输出文件名 → 文本内容 (保持输出顺序)
pub type ExportOutput = IndexMap<String, String>;

pub const STREAM_MAIN: &str = "main";
pub const STREAM_HEADER: &str = "header";
pub const STREAM_DETAIL: &str = "detail";
pub const STREAM_SPECIAL_REGIMES: &str = "specialRegimes";

/// 目标会计系统版式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Layout {
    /// 通用 `;` 分隔 12 列
    Generic,
    /// `;` 分隔 28 列, 带表头
    LayoutA,
    /// 定长三文件
    LayoutB,
    /// 占位, 暂同通用格式
    LayoutC,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Generic => "generic",
            Layout::LayoutA => "layoutA",
            Layout::LayoutB => "layoutB",
            Layout::LayoutC => "layoutC",
        }
    }
}

impl FromStr for Layout {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Layout::Generic),
            "layouta" | "holistor" => Ok(Layout::LayoutA),
            "layoutb" | "bejerman" => Ok(Layout::LayoutB),
            "layoutc" | "tango" => Ok(Layout::LayoutC),
            _ => Err(ExportError::UnknownLayout(s.to_string())),
        }
    }
}

impl TryFrom<String> for Layout {
    type Error = ExportError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        layout.as_str().to_string()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按版式生成导出文件内容
///
/// 按批次顺序处理; 识别失败的条目输出默认行, 不中断整批
pub fn format(batch: &ExportBatch, layout: Layout) -> Result<ExportOutput> {
    let mut output = ExportOutput::new();

    match layout {
        Layout::Generic | Layout::LayoutC => {
            output.insert(STREAM_MAIN.to_string(), layout_generic::render(batch)?);
        }
        Layout::LayoutA => {
            output.insert(STREAM_MAIN.to_string(), layout_a::render(batch)?);
        }
        Layout::LayoutB => {
            output.insert(STREAM_HEADER.to_string(), layout_b::render_header(batch));
            output.insert(STREAM_DETAIL.to_string(), layout_b::render_detail(batch));
            output.insert(
                STREAM_SPECIAL_REGIMES.to_string(),
                layout_b::render_special_regimes(batch),
            );
        }
    }

    tracing::info!(
        "Formatted {} entries with layout {} into {} stream(s)",
        batch.len(),
        layout,
        output.len()
    );
    Ok(output)
}

/// 版式名称未知时返回 `ExportError::UnknownLayout`
pub fn format_named(batch: &ExportBatch, layout: &str) -> Result<ExportOutput> {
    let layout = layout.parse::<Layout>().map_err(|e| {
        tracing::warn!("Rejected export request: {}", e);
        e
    })?;
    format(batch, layout)
}
