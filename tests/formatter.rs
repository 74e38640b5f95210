use invoice_export::models::{BatchEntry, ExportBatch, InvoiceRecord};
use invoice_export::service::formatter::{
    STREAM_DETAIL, STREAM_HEADER, STREAM_MAIN, STREAM_SPECIAL_REGIMES,
};
use invoice_export::service::layout_b::{DETAIL_WIDTH, HEADER_WIDTH, REGIME_WIDTH};
use invoice_export::{format, format_named, ExportError, Layout};
use pretty_assertions::assert_eq;
use serde_json::json;

fn record(value: serde_json::Value) -> InvoiceRecord {
    serde_json::from_value(value).unwrap()
}

fn minimal_invoice() -> InvoiceRecord {
    record(json!({
        "datos_comprobante": {
            "tipo": "Factura", "letra": "A", "punto_venta": "1", "numero_comprobante": "123"
        },
        "totales": {
            "total_comprobante": 121.00,
            "ivAs": [{"alicuota": 21, "importe_iva": 21.00}]
        }
    }))
}

#[test]
fn generic_layout_end_to_end() {
    let batch = ExportBatch::new(vec![BatchEntry::extracted("factura.jpg", minimal_invoice())]);

    let out = format(&batch, Layout::Generic).unwrap();
    let expected = "FECHA_EMISION;TIPO;LETRA;PTO_VTA;NRO;CUIT_EMISOR;RAZON_EMISOR;\
CUIT_O_DNI_RECEPTOR;RAZON_RECEPTOR;NETO_GRAVADO;IVA_21;TOTAL\n\
;Factura;A;1;123;;;;;;21.0;121.0";
    assert_eq!(out[STREAM_MAIN], expected);
}

#[test]
fn unknown_layout_is_rejected() {
    let batch = ExportBatch::new(vec![BatchEntry::extracted("factura.jpg", minimal_invoice())]);
    match format_named(&batch, "quickbooks") {
        Err(ExportError::UnknownLayout(name)) => assert_eq!(name, "quickbooks"),
        other => panic!("expected UnknownLayout, got {:?}", other),
    }
}

#[test]
fn layout_b_produces_three_fixed_width_files() {
    let mut invoice = minimal_invoice();
    invoice.totals.gross_receipts_withholding = Some(2.5.into());

    let batch = ExportBatch::new(vec![
        BatchEntry::extracted("factura.jpg", invoice),
        BatchEntry::failed("notes.docx", "Tipo de archivo no soportado"),
    ]);

    let out = format_named(&batch, "layoutB").unwrap();

    let header: Vec<&str> = out[STREAM_HEADER].split('\n').collect();
    assert_eq!(header.len(), 2);
    assert!(header.iter().all(|l| l.chars().count() == HEADER_WIDTH));
    assert!(header[0].starts_with("FC A0001000001230000000000000000@@@#@@"));

    let detail: Vec<&str> = out[STREAM_DETAIL].split('\n').collect();
    assert_eq!(detail.len(), 2);
    assert!(detail.iter().all(|l| l.chars().count() == DETAIL_WIDTH));

    let regimes: Vec<&str> = out[STREAM_SPECIAL_REGIMES].split('\n').collect();
    assert_eq!(regimes.len(), 1);
    assert_eq!(regimes[0].chars().count(), REGIME_WIDTH);
    assert!(regimes[0].ends_with("000200020000000000002.50"));
}

#[test]
fn records_keep_batch_order() {
    let entries: Vec<BatchEntry> = (1..=20)
        .map(|n| {
            BatchEntry::extracted(
                format!("{}.jpg", n),
                record(json!({"datos_comprobante": {"numero_comprobante": n.to_string()}})),
            )
        })
        .collect();
    let batch = ExportBatch::new(entries);

    let out = format(&batch, Layout::LayoutA).unwrap();
    let numbers: Vec<String> = out[STREAM_MAIN]
        .lines()
        .skip(1)
        .map(|l| l.split(';').nth(3).unwrap().to_string())
        .collect();
    let expected: Vec<String> = (1..=20).map(|n: i32| n.to_string()).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn delimited_output_never_splits_on_field_content() {
    let batch = ExportBatch::new(vec![BatchEntry::extracted(
        "a.jpg",
        record(json!({
            "emisor": {"razon_social": "Uno; Dos; Tres SA", "domicilio_comercial": "Calle 1;2"},
            "receptor": {"razon_social": ";;"}
        })),
    )]);

    for (layout, columns) in [(Layout::Generic, 12), (Layout::LayoutA, 28)] {
        let out = format(&batch, layout).unwrap();
        for line in out[STREAM_MAIN].lines() {
            assert_eq!(line.split(';').count(), columns);
        }
    }
}

#[test]
fn failed_entry_renders_defaults_even_with_record() {
    let entry: BatchEntry = serde_json::from_value(json!({
        "filename": "scan.pdf",
        "error": "extraction failed",
        "record": {
            "datos_comprobante": {"tipo": "Factura"},
            "totales": {"total_comprobante": 99}
        }
    }))
    .unwrap();
    let batch = ExportBatch::new(vec![entry]);

    let out = format(&batch, Layout::Generic).unwrap();
    assert_eq!(out[STREAM_MAIN].lines().nth(1), Some(";;;;;;;;;;;"));

    let out = format(&batch, Layout::LayoutB).unwrap();
    assert!(out[STREAM_HEADER].starts_with("FC  00000000"));
    assert_eq!(out[STREAM_SPECIAL_REGIMES], "");
}
