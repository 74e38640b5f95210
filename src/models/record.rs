use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 叶子值: AI 返回的字符串 / 数字 / 布尔
///
/// 数字保留 JSON 原文 (`121.0` 与 `121` 输出不同)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl Scalar {
    /// 空值判断 (空串、"null"、0、false 都算空)
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
            Scalar::Flag(b) => !b,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Flag(true) => f.write_str("True"),
            Scalar::Flag(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::Text(String::new()))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Number(v.into())
    }
}

/// `null` 分组按空分组处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 识别结果 (一张票据一份, 用完即弃)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
    #[serde(rename = "datos_comprobante", deserialize_with = "null_as_default")]
    pub document: DocumentData,
    #[serde(rename = "emisor", deserialize_with = "null_as_default")]
    pub issuer: Issuer,
    #[serde(rename = "receptor", deserialize_with = "null_as_default")]
    pub recipient: Recipient,
    #[serde(rename = "totales", deserialize_with = "null_as_default")]
    pub totals: Totals,
    #[serde(rename = "items", deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(rename = "datos_fiscales_afip", deserialize_with = "null_as_default")]
    pub fiscal_authorization: FiscalAuthorization,
    #[serde(rename = "datos_compras_importaciones", deserialize_with = "null_as_default")]
    pub procurement: ProcurementMeta,
}

/// 票据基本信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    #[serde(rename = "tipo")]
    pub kind: Option<Scalar>,
    #[serde(rename = "letra")]
    pub letter: Option<Scalar>,
    #[serde(rename = "punto_venta")]
    pub point_of_sale: Option<Scalar>,
    #[serde(rename = "numero_comprobante")]
    pub number: Option<Scalar>,
    #[serde(rename = "fecha_emision")]
    pub issue_date: Option<Scalar>,
    #[serde(rename = "fecha_vencimiento")]
    pub due_date: Option<Scalar>,
    #[serde(rename = "condicion_venta")]
    pub payment_terms: Option<Scalar>,
    #[serde(rename = "moneda")]
    pub currency: Option<Scalar>,
    #[serde(rename = "cotizacion_moneda")]
    pub exchange_rate: Option<Scalar>,
}

/// 开票方
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issuer {
    #[serde(rename = "razon_social")]
    pub legal_name: Option<Scalar>,
    #[serde(rename = "cuit")]
    pub tax_id: Option<Scalar>,
    #[serde(rename = "domicilio_comercial")]
    pub address: Option<Scalar>,
    #[serde(rename = "condicion_iva")]
    pub tax_status: Option<Scalar>,
    #[serde(rename = "condicion_ingresos_brutos")]
    pub gross_receipts_id: Option<Scalar>,
    #[serde(rename = "localidad")]
    pub locality: Option<Scalar>,
    #[serde(rename = "provincia")]
    pub province: Option<Scalar>,
    #[serde(rename = "pais")]
    pub country: Option<Scalar>,
}

/// 受票方
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    #[serde(rename = "razon_social")]
    pub legal_name: Option<Scalar>,
    #[serde(rename = "cuit")]
    pub tax_id: Option<Scalar>,
    #[serde(rename = "domicilio_comercial")]
    pub address: Option<Scalar>,
    #[serde(rename = "condicion_iva")]
    pub tax_status: Option<Scalar>,
    #[serde(rename = "condicion_ingresos_brutos")]
    pub gross_receipts_id: Option<Scalar>,
    #[serde(rename = "tipo_documento")]
    pub document_type: Option<Scalar>,
    #[serde(rename = "numero_documento")]
    pub document_number: Option<Scalar>,
}

/// 税率 + 税额
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VatLine {
    #[serde(rename = "alicuota")]
    pub rate: Option<Scalar>,
    #[serde(rename = "importe_iva")]
    pub amount: Option<Scalar>,
}

/// 合计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    #[serde(rename = "importe_neto_gravado")]
    pub taxed_net: Option<Scalar>,
    #[serde(rename = "importe_neto_no_gravado")]
    pub untaxed_net: Option<Scalar>,
    #[serde(rename = "importe_exento")]
    pub exempt: Option<Scalar>,
    #[serde(rename = "ivAs", deserialize_with = "null_as_default")]
    pub vat: Vec<VatLine>,
    #[serde(rename = "percepciones_iva")]
    pub vat_withholding: Option<Scalar>,
    #[serde(rename = "percepciones_ingresos_brutos")]
    pub gross_receipts_withholding: Option<Scalar>,
    #[serde(rename = "percepciones_otras")]
    pub other_withholding: Option<Scalar>,
    #[serde(rename = "descuentos_generales")]
    pub general_discounts: Option<Scalar>,
    pub subtotal: Option<Scalar>,
    #[serde(rename = "total_comprobante")]
    pub total: Option<Scalar>,
}

/// 明细行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(rename = "codigo")]
    pub code: Option<Scalar>,
    #[serde(rename = "descripcion")]
    pub description: Option<Scalar>,
    #[serde(rename = "unidad_medida")]
    pub unit: Option<Scalar>,
    #[serde(rename = "cantidad")]
    pub quantity: Option<Scalar>,
    #[serde(rename = "precio_unitario")]
    pub unit_price: Option<Scalar>,
    #[serde(rename = "bonificacion")]
    pub discount: Option<Scalar>,
    #[serde(rename = "alicuota_iva")]
    pub vat_rate: Option<Scalar>,
    #[serde(rename = "importe_total_renglon")]
    pub line_total: Option<Scalar>,
}

/// 税务授权 (CAE)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalAuthorization {
    #[serde(rename = "cae")]
    pub code: Option<Scalar>,
    #[serde(rename = "fecha_vencimiento_cae")]
    pub expiry: Option<Scalar>,
    #[serde(rename = "codigo_barras_qr")]
    pub barcode: Option<Scalar>,
    #[serde(rename = "tipo_documento_receptor")]
    pub recipient_document_type: Option<Scalar>,
    #[serde(rename = "numero_documento_receptor")]
    pub recipient_document_number: Option<Scalar>,
}

/// 采购 / 进口信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementMeta {
    #[serde(rename = "condicion_bienes")]
    pub goods_condition: Option<Scalar>,
    #[serde(rename = "centro_costo")]
    pub cost_center: Option<Scalar>,
    #[serde(rename = "numero_remito")]
    pub receipt_number: Option<Scalar>,
    #[serde(rename = "numero_despacho_importacion")]
    pub import_declaration: Option<Scalar>,
    #[serde(rename = "gastos_relacionados")]
    pub related_expenses: Option<Scalar>,
}
