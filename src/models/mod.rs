pub mod batch;
pub mod record;

pub use batch::{BatchEntry, ExportBatch};
pub use record::{
    DocumentData, FiscalAuthorization, InvoiceRecord, Issuer, LineItem, ProcurementMeta,
    Recipient, Scalar, Totals, VatLine,
};
