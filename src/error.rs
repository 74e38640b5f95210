use thiserror::Error;

/// 导出错误
///
/// 上游数据缺失或格式错误不会报错, 只有版式选择错误会返回给调用方
#[derive(Error, Debug)]
pub enum ExportError {
    /// 未知的导出版式
    #[error("unknown export layout: {0}")]
    UnknownLayout(String),

    /// 分隔符文件写入失败
    #[error("delimited write failed: {0}")]
    Write(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
