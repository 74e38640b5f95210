//! 定长三文件版式: 表头 / 明细 / 特殊税制
//!
//! 字段无分隔符, 全靠定宽: 文本右补空格, 数字左补零, 超长截断

use super::coerce::{
    amount_field, date_yyyymmdd, is_blank, is_missing, only_digits, pad_left, pad_right, text,
    text_or, to_decimal,
};
use super::codes;
use super::tax::split_gross;
use crate::models::{ExportBatch, InvoiceRecord, LineItem, Totals};
use bigdecimal::{BigDecimal, Zero};
use rayon::prelude::*;

/// 供应商自动重编码标记
const SUPPLIER_AUTO_CODE: &str = "@@@#@@";

pub const HEADER_WIDTH: usize = 325;
pub const DETAIL_WIDTH: usize = 348;
pub const REGIME_WIDTH: usize = 62;

/// 特殊税制: (代码, 条款)
pub const REGIME_VAT: (&str, &str) = ("0001", "0001");
pub const REGIME_GROSS_RECEIPTS: (&str, &str) = ("0002", "0002");
pub const REGIME_OTHER: (&str, &str) = ("0003", "0003");

/// 定长行拼接
#[derive(Debug, Default)]
struct FixedLine(String);

impl FixedLine {
    /// 文本: 右补空格
    fn text(mut self, value: &str, width: usize) -> Self {
        self.0.push_str(&pad_right(value, width));
        self
    }

    /// 数字: 左补零
    fn digits(mut self, value: &str, width: usize) -> Self {
        self.0.push_str(&pad_left(value, width, '0'));
        self
    }

    fn amount(mut self, value: &BigDecimal, width: usize) -> Self {
        self.0.push_str(&amount_field(value, width));
        self
    }

    fn date(mut self, value: &str) -> Self {
        self.0.push_str(&date_yyyymmdd(value));
        self
    }

    fn finish(self) -> String {
        self.0
    }
}

/// 三个文件共用的前 7 个字段 (票据标识 + 供应商)
fn voucher_prefix(record: &InvoiceRecord) -> FixedLine {
    let dc = &record.document;
    let letter = text_or(dc.letter.as_ref(), "");
    let letter = letter.trim().chars().next().unwrap_or(' ').to_string();

    FixedLine::default()
        .text(codes::voucher_type(&text(dc.kind.as_ref())), 3)
        .text(&letter, 1)
        .digits(&only_digits(&text(dc.point_of_sale.as_ref())), 4)
        .digits(&only_digits(&text(dc.number.as_ref())), 8)
        .digits("", 8)
        .date(&text(dc.issue_date.as_ref()))
        .text(SUPPLIER_AUTO_CODE, 6)
}

/// 表头文件一行 (35 个字段)
pub fn header_line(record: &InvoiceRecord) -> String {
    let dc = &record.document;
    let em = &record.issuer;

    voucher_prefix(record)
        .text(&text(em.legal_name.as_ref()), 40)
        // 证件类型 1 = CUIT
        .digits("1", 2)
        .digits(codes::province(&text(em.province.as_ref())), 3)
        .text(codes::tax_status(&text(em.tax_status.as_ref())), 1)
        .digits(&only_digits(&text(em.tax_id.as_ref())), 11)
        .text(&text(em.gross_receipts_id.as_ref()), 15)
        .text("", 4)
        .text("", 4)
        // 付款条件 1 = 现金
        .digits("1", 3)
        .text("", 4)
        .date(&text(dc.due_date.as_ref()))
        .amount(&to_decimal(record.totals.total.as_ref()), 16)
        .text("", 4)
        .text(&text(em.address.as_ref()), 30)
        .text("", 8)
        .text(&text(em.locality.as_ref()), 25)
        // 不更新库存
        .text("N", 1)
        .text("", 15)
        .text("", 15)
        .digits("0", 8)
        .digits("0", 8)
        .digits("0", 8)
        .digits("0", 8)
        .text("", 8)
        .digits("", 8)
        .digits("", 4)
        .text(&text(record.procurement.import_declaration.as_ref()), 25)
        .text("", 1)
        .finish()
}

/// 明细税率: 明细自带 > 单一税率 > 0
fn item_rate(item: &LineItem, totals: &Totals) -> BigDecimal {
    if !is_missing(item.vat_rate.as_ref()) {
        return to_decimal(item.vat_rate.as_ref());
    }
    match totals.vat.as_slice() {
        [only] => to_decimal(only.rate.as_ref()),
        _ => BigDecimal::zero(),
    }
}

/// 税率为 0 时区分免税 (2) / 不征税 (3)
fn vat_kind(rate: &BigDecimal, totals: &Totals) -> &'static str {
    if !rate.is_zero() {
        return "1";
    }
    let exempt = to_decimal(totals.exempt.as_ref());
    let untaxed = to_decimal(totals.untaxed_net.as_ref());
    let zero = BigDecimal::zero();
    if untaxed > zero && exempt.is_zero() {
        "3"
    } else {
        "2"
    }
}

/// 明细文件一行 (30 个字段)
pub fn detail_line(record: &InvoiceRecord, item: &LineItem) -> String {
    let tot = &record.totals;
    let zero = BigDecimal::zero();

    let quantity = if is_blank(item.quantity.as_ref()) {
        BigDecimal::from(1)
    } else {
        to_decimal(item.quantity.as_ref())
    };

    let unit_price = if !is_blank(item.unit_price.as_ref()) {
        to_decimal(item.unit_price.as_ref())
    } else {
        to_decimal(item.line_total.as_ref())
    };

    let rate = item_rate(item, tot);
    // 明细无金额时用票据总额
    let line_total = to_decimal(item.line_total.as_ref().or(tot.total.as_ref()));
    let split = split_gross(&line_total, &rate);

    voucher_prefix(record)
        // C = 费用项, 不动库存
        .text("C", 1)
        .text(&text_or(item.code.as_ref(), ""), 23)
        .amount(&quantity, 16)
        .amount(&zero, 16)
        .text(&text(item.description.as_ref()), 50)
        .amount(&unit_price, 16)
        .amount(&rate, 8)
        .amount(&zero, 8)
        .amount(&split.tax, 16)
        .amount(&zero, 16)
        .amount(&split.net, 16)
        .amount(&zero, 16)
        .amount(&zero, 16)
        .digits("", 4)
        .amount(&zero, 16)
        .text(vat_kind(&rate, tot), 1)
        .amount(&zero, 16)
        .digits("", 3)
        .text("", 26)
        .amount(&zero, 8)
        .amount(&line_total, 16)
        // 直接计入进项 / 本地采购
        .text("1", 1)
        .text("0", 1)
        .finish()
}

/// 特殊税制文件一行 (10 个字段)
pub fn regime_line(record: &InvoiceRecord, regime: (&str, &str), amount: &BigDecimal) -> String {
    voucher_prefix(record)
        .digits(regime.0, 4)
        .digits(regime.1, 4)
        .amount(amount, 16)
        .finish()
}

/// 票据上非零的代扣项
pub fn regime_lines(record: &InvoiceRecord) -> Vec<String> {
    let tot = &record.totals;
    [
        (REGIME_VAT, tot.vat_withholding.as_ref()),
        (REGIME_GROSS_RECEIPTS, tot.gross_receipts_withholding.as_ref()),
        (REGIME_OTHER, tot.other_withholding.as_ref()),
    ]
    .into_iter()
    .filter_map(|(regime, value)| {
        let amount = to_decimal(value);
        (!amount.is_zero()).then(|| regime_line(record, regime, &amount))
    })
    .collect()
}

/// 明细行; 无明细时补一条空明细
pub fn detail_lines(record: &InvoiceRecord) -> Vec<String> {
    if record.line_items.is_empty() {
        return vec![detail_line(record, &LineItem::default())];
    }
    record
        .line_items
        .iter()
        .map(|item| detail_line(record, item))
        .collect()
}

pub fn render_header(batch: &ExportBatch) -> String {
    let lines: Vec<String> = batch
        .entries
        .par_iter()
        .map(|entry| header_line(&entry.effective_record()))
        .collect();
    lines.join("\n")
}

pub fn render_detail(batch: &ExportBatch) -> String {
    let lines: Vec<Vec<String>> = batch
        .entries
        .par_iter()
        .map(|entry| detail_lines(&entry.effective_record()))
        .collect();
    lines.concat().join("\n")
}

pub fn render_special_regimes(batch: &ExportBatch) -> String {
    let lines: Vec<Vec<String>> = batch
        .entries
        .par_iter()
        .map(|entry| regime_lines(&entry.effective_record()))
        .collect();
    lines.concat().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchEntry;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn record(value: serde_json::Value) -> InvoiceRecord {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> InvoiceRecord {
        record(json!({
            "datos_comprobante": {
                "tipo": "Factura", "letra": "a ", "punto_venta": "0003",
                "numero_comprobante": "0001-00001234", "fecha_emision": "2025-07-03",
                "fecha_vencimiento": "03/08/2025"
            },
            "emisor": {
                "razon_social": "Distribuidora Sur SA", "cuit": "30-71234567-9",
                "domicilio_comercial": "Av. Siempre Viva 742", "condicion_iva": "Monotributo",
                "condicion_ingresos_brutos": "901-123456-7", "localidad": "Quilmes",
                "provincia": "Buenos Aires"
            },
            "totales": {
                "ivAs": [{"alicuota": 21, "importe_iva": 21}],
                "percepciones_iva": 3.5,
                "percepciones_otras": "1.25",
                "total_comprobante": 125.75
            },
            "items": [
                {"codigo": "A1", "descripcion": "Tornillos", "cantidad": 2,
                 "precio_unitario": 60.5, "importe_total_renglon": 121}
            ],
            "datos_compras_importaciones": {"numero_despacho_importacion": "25001IC04000123A"}
        }))
    }

    /// 按宽度切分定长行
    fn slice(line: &str, widths: &[usize]) -> Vec<String> {
        let chars: Vec<char> = line.chars().collect();
        let mut pos = 0;
        widths
            .iter()
            .map(|w| {
                let s: String = chars[pos..pos + w].iter().collect();
                pos += w;
                s
            })
            .collect()
    }

    const HEADER_WIDTHS: [usize; 35] = [
        3, 1, 4, 8, 8, 8, 6, 40, 2, 3, 1, 11, 15, 4, 4, 3, 4, 8, 16, 4, 30, 8, 25, 1, 15, 15, 8, 8,
        8, 8, 8, 8, 4, 25, 1,
    ];

    #[test]
    fn test_widths_add_up() {
        assert_eq!(HEADER_WIDTHS.iter().sum::<usize>(), HEADER_WIDTH);
    }

    #[test]
    fn test_header_line() {
        let line = header_line(&sample());
        assert_eq!(line.chars().count(), HEADER_WIDTH);

        let f = slice(&line, &HEADER_WIDTHS);
        assert_eq!(f[0], "FC ");
        assert_eq!(f[1], "a");
        assert_eq!(f[2], "0003");
        // 只取数字后截断到 8 位
        assert_eq!(f[3], "00010000");
        assert_eq!(f[4], "00000000");
        assert_eq!(f[5], "20250703");
        assert_eq!(f[6], "@@@#@@");
        assert_eq!(f[7].trim_end(), "Distribuidora Sur SA");
        assert_eq!(f[8], "01");
        assert_eq!(f[9], "002");
        assert_eq!(f[10], "6");
        assert_eq!(f[11], "30712345679");
        assert_eq!(f[12], "901-123456-7   ");
        assert_eq!(f[15], "001");
        assert_eq!(f[17], "20250803");
        assert_eq!(f[18], "0000000000125.75");
        assert_eq!(f[22].trim_end(), "Quilmes");
        assert_eq!(f[23], "N");
        assert_eq!(f[26], "00000000");
        assert_eq!(f[31], "00000000");
        assert_eq!(f[32], "0000");
        assert_eq!(f[33].trim_end(), "25001IC04000123A");
        assert_eq!(f[34], " ");
    }

    #[test]
    fn test_empty_header_line() {
        let line = header_line(&InvoiceRecord::default());
        assert_eq!(line.chars().count(), HEADER_WIDTH);
        assert!(line.starts_with("FC  0000000000000000000000000000@@@#@@"));
    }

    #[test]
    fn test_long_name_is_truncated() {
        let r = record(json!({"emisor": {"razon_social": "X".repeat(80)}}));
        let line = header_line(&r);
        assert_eq!(line.chars().count(), HEADER_WIDTH);
    }

    const DETAIL_WIDTHS: [usize; 30] = [
        3, 1, 4, 8, 8, 8, 6, 1, 23, 16, 16, 50, 16, 8, 8, 16, 16, 16, 16, 16, 4, 16, 1, 16, 3, 26,
        8, 16, 1, 1,
    ];

    #[test]
    fn test_detail_line() {
        let r = sample();
        let lines = detail_lines(&r);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].chars().count(), DETAIL_WIDTH);
        assert_eq!(DETAIL_WIDTHS.iter().sum::<usize>(), DETAIL_WIDTH);

        let f = slice(&lines[0], &DETAIL_WIDTHS);
        assert_eq!(f[7], "C");
        assert_eq!(f[8].trim_end(), "A1");
        assert_eq!(f[9], "0000000000002.00");
        assert_eq!(f[11].trim_end(), "Tornillos");
        assert_eq!(f[12], "0000000000060.50");
        assert_eq!(f[13], "00021.00");
        assert_eq!(f[15], "0000000000021.00");
        assert_eq!(f[17], "0000000000100.00");
        assert_eq!(f[20], "0000");
        assert_eq!(f[22], "1");
        assert_eq!(f[24], "000");
        assert_eq!(f[27], "0000000000121.00");
        assert_eq!(f[28], "1");
        assert_eq!(f[29], "0");
    }

    #[test]
    fn test_synthetic_item_uses_document_total() {
        let r = record(json!({
            "totales": {"total_comprobante": 50, "importe_neto_no_gravado": 50}
        }));
        let lines = detail_lines(&r);
        assert_eq!(lines.len(), 1);

        let f = slice(&lines[0], &DETAIL_WIDTHS);
        assert_eq!(f[9], "0000000000001.00");
        assert_eq!(f[12], "0000000000000.00");
        assert_eq!(f[13], "00000.00");
        assert_eq!(f[17], "0000000000050.00");
        assert_eq!(f[22], "3");
        assert_eq!(f[27], "0000000000050.00");
    }

    #[test]
    fn test_single_document_rate_applies_to_items() {
        let r = record(json!({
            "totales": {"ivAs": [{"alicuota": "10.5"}]},
            "items": [{"importe_total_renglon": "1000"}, {"importe_total_renglon": 0, "alicuota_iva": 0}]
        }));
        let lines = detail_lines(&r);
        assert_eq!(lines.len(), 2);

        let first = slice(&lines[0], &DETAIL_WIDTHS);
        assert_eq!(first[13], "00010.50");
        assert_eq!(first[15], "0000000000095.02");
        assert_eq!(first[17], "0000000000904.98");

        let second = slice(&lines[1], &DETAIL_WIDTHS);
        assert_eq!(second[13], "00000.00");
        assert_eq!(second[22], "2");
    }

    #[test]
    fn test_regime_lines() {
        let r = sample();
        let lines = regime_lines(&r);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.chars().count(), REGIME_WIDTH);
        }
        assert!(lines[0].ends_with("000100010000000000003.50"));
        assert!(lines[1].ends_with("000300030000000000001.25"));
    }

    #[test]
    fn test_regime_line_fields() {
        let amount = BigDecimal::from_str("7.1").unwrap();
        let line = regime_line(&InvoiceRecord::default(), REGIME_GROSS_RECEIPTS, &amount);
        assert_eq!(
            line,
            "FC  0000000000000000000000000000@@@#@@000200020000000000007.10"
        );
    }

    #[test]
    fn test_render_batch() {
        let batch = ExportBatch::new(vec![
            BatchEntry::extracted("a.pdf", sample()),
            BatchEntry::failed("b.bmp", "unsupported"),
        ]);

        assert_eq!(render_header(&batch).lines().count(), 2);
        assert_eq!(render_detail(&batch).lines().count(), 2);
        assert_eq!(render_special_regimes(&batch).lines().count(), 2);

        let empty = ExportBatch::new(vec![BatchEntry::failed("b.bmp", "unsupported")]);
        assert_eq!(render_special_regimes(&empty), "");
    }

    #[test]
    fn test_zero_letter_and_code_render_blank() {
        let r = record(json!({
            "datos_comprobante": {"letra": 0},
            "items": [{"codigo": 0, "descripcion": "Flete"}]
        }));

        assert!(header_line(&r).starts_with("FC  0000"));
        let detail = detail_line(&r, &r.line_items[0]);
        let code: String = detail.chars().skip(39).take(23).collect();
        assert_eq!(code, " ".repeat(23));
    }
}
