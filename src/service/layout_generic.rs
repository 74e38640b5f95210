use super::coerce::{is_blank, text, text_or};
use super::delimited::DelimitedWriter;
use crate::error::Result;
use crate::models::{ExportBatch, InvoiceRecord};
use rayon::prelude::*;

pub const HEADER: &str = "FECHA_EMISION;TIPO;LETRA;PTO_VTA;NRO;\
CUIT_EMISOR;RAZON_EMISOR;CUIT_O_DNI_RECEPTOR;\
RAZON_RECEPTOR;NETO_GRAVADO;IVA_21;TOTAL";

/// 通用格式一行 (12 个字段)
pub fn line_fields(record: &InvoiceRecord) -> Vec<String> {
    let dc = &record.document;
    let em = &record.issuer;
    let rec = &record.recipient;
    let tot = &record.totals;

    // 受票方 CUIT, 没有则用证件号
    let recipient_id = if !is_blank(rec.tax_id.as_ref()) {
        text(rec.tax_id.as_ref())
    } else {
        text_or(rec.document_number.as_ref(), "")
    };

    // 取第一条税额 (通常是 21%)
    let first_vat = tot
        .vat
        .first()
        .map(|v| text_or(v.amount.as_ref(), ""))
        .unwrap_or_default();

    vec![
        text(dc.issue_date.as_ref()),
        text(dc.kind.as_ref()),
        text(dc.letter.as_ref()),
        text(dc.point_of_sale.as_ref()),
        text(dc.number.as_ref()),
        text(em.tax_id.as_ref()),
        text(em.legal_name.as_ref()),
        recipient_id,
        text(rec.legal_name.as_ref()),
        text(tot.taxed_net.as_ref()),
        first_vat,
        text(tot.total.as_ref()),
    ]
}

/// 表头 + 每张票据一行
pub fn render(batch: &ExportBatch) -> Result<String> {
    let lines: Vec<Vec<String>> = batch
        .entries
        .par_iter()
        .map(|entry| line_fields(&entry.effective_record()))
        .collect();

    let mut writer = DelimitedWriter::new();
    writer.write_header(HEADER)?;
    for line in &lines {
        writer.write_line(line)?;
    }
    writer.finish()
}
