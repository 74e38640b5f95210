use super::coerce::{fixed2, is_blank, parse_decimal, round2, text_or, to_decimal, zfill};
use super::delimited::DelimitedWriter;
use super::tax::{split_gross, withholdings_total};
use crate::error::Result;
use crate::models::{ExportBatch, InvoiceRecord, Scalar};
use bigdecimal::{BigDecimal, Zero};
use rayon::prelude::*;

pub const HEADER: &str = "Nombre Comprobante;Tipo Comprobante;Numero Sucursal;Numero de Comprobante;\
Fecha Emision;Fecha Recepcion;Codigo Neto Gravado;Neto Gravado;\
Cod Concepto no Gravado;Conceptos no Gravados;\
Cod Operacion Exenta;Operaciones Exentas;\
Codigo Perc_Ret_PCta;Percepciones;\
Tasa IVA;IVA Liquidado;Credito Fiscal;Total;\
Condicion Fiscal Proveedor;CUIT Proveedor;Nombre Proveedor;Domicilio Proveedor;\
Codigo Postal;Provincia;Tipo Documento Cliente;Moneda;Tipo Cambio;CAI";

/// 缺失按 0.00, 无法解析为空
fn amount_or_zero(v: Option<&Scalar>) -> String {
    if is_blank(v) {
        return "0.00".to_string();
    }
    parse_decimal(v).map(|d| fixed2(&d)).unwrap_or_default()
}

/// 缺失或无法解析为空
fn optional_amount(v: Option<&Scalar>) -> String {
    if is_blank(v) {
        return String::new();
    }
    parse_decimal(v).map(|d| fixed2(&d)).unwrap_or_default()
}

/// 首字母大写, 其余小写
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 反算净额: (总额 - 不征税 - 免税 - 代扣) / (1 + 税率/100)
pub fn recomputed_net(record: &InvoiceRecord) -> BigDecimal {
    let tot = &record.totals;
    let rate = to_decimal(tot.vat.first().and_then(|v| v.rate.as_ref()));
    let base = to_decimal(tot.total.as_ref())
        - to_decimal(tot.untaxed_net.as_ref())
        - to_decimal(tot.exempt.as_ref())
        - withholdings_total(&record.totals);

    round2(&split_gross(&base, &rate).net)
}

fn flag_code(amount: &BigDecimal, code: &str) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        code.to_string()
    }
}

/// 一行 28 个字段
pub fn line_fields(record: &InvoiceRecord) -> Vec<String> {
    let dc = &record.document;
    let em = &record.issuer;
    let rec = &record.recipient;
    let tot = &record.totals;

    let first_vat = tot.vat.first();
    let vat_rate = first_vat.and_then(|v| v.rate.as_ref());
    let vat_amount = first_vat.and_then(|v| v.amount.as_ref());

    let net = recomputed_net(record);
    let untaxed = to_decimal(tot.untaxed_net.as_ref());
    let exempt = to_decimal(tot.exempt.as_ref());
    let withholdings = withholdings_total(&record.totals);

    // 80 = CUIT, 96 = DNI
    let client_doc_type = if !is_blank(rec.tax_id.as_ref()) {
        "80"
    } else if !is_blank(rec.document_number.as_ref()) {
        "96"
    } else {
        ""
    };

    let issue_date = text_or(dc.issue_date.as_ref(), "");
    // 信用额度暂按税额
    let fiscal_credit = amount_or_zero(vat_amount);

    vec![
        capitalize(&text_or(dc.kind.as_ref(), "Factura")),
        text_or(dc.letter.as_ref(), ""),
        zfill(&text_or(dc.point_of_sale.as_ref(), ""), 4),
        text_or(dc.number.as_ref(), ""),
        issue_date.clone(),
        issue_date,
        flag_code(&net, "1"),
        fixed2(&net),
        flag_code(&untaxed, "2"),
        amount_or_zero(tot.untaxed_net.as_ref()),
        flag_code(&exempt, "3"),
        amount_or_zero(tot.exempt.as_ref()),
        flag_code(&withholdings, "1"),
        fixed2(&withholdings),
        amount_or_zero(vat_rate),
        amount_or_zero(vat_amount),
        fiscal_credit,
        amount_or_zero(tot.total.as_ref()),
        text_or(em.tax_status.as_ref(), ""),
        text_or(em.tax_id.as_ref(), ""),
        text_or(em.legal_name.as_ref(), ""),
        text_or(em.address.as_ref(), ""),
        String::new(),
        text_or(em.province.as_ref(), ""),
        client_doc_type.to_string(),
        text_or(dc.currency.as_ref(), ""),
        optional_amount(dc.exchange_rate.as_ref()),
        text_or(record.fiscal_authorization.code.as_ref(), ""),
    ]
}

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
