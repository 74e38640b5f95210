use crate::error::Result;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io;

/// 字段分隔符
pub const DELIMITER: char = ';';

/// `;` 分隔的文本文件, 不加引号
///
/// 字段内的 `;` 写入前替换为 `,`, 保证列对齐
pub struct DelimitedWriter {
    inner: csv::Writer<Vec<u8>>,
}

impl DelimitedWriter {
    pub fn new() -> Self {
        let inner = WriterBuilder::new()
            .delimiter(DELIMITER as u8)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(Vec::new());
        Self { inner }
    }

    /// 原样写一行表头
    pub fn write_header(&mut self, header: &str) -> Result<()> {
        self.inner.write_record(header.split(DELIMITER))?;
        Ok(())
    }

    pub fn write_line<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let safe = fields
            .into_iter()
            .map(|f| f.as_ref().replace(DELIMITER, ","));
        self.inner.write_record(safe)?;
        Ok(())
    }

    /// 行间以 `\n` 连接, 末行不带换行
    pub fn finish(self) -> Result<String> {
        let bytes = self.inner.into_inner().map_err(|e| e.into_error())?;
        let mut text =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }
}

impl Default for DelimitedWriter {
    fn default() -> Self {
        Self::new()
    }
}
