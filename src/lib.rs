pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::ExportError;
pub use models::{BatchEntry, ExportBatch, InvoiceRecord};
pub use service::{format, format_named, ExportOutput, ExportService, Layout};
