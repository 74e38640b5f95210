pub mod codes;
pub mod coerce;
pub mod delimited;
pub mod export;
pub mod formatter;
pub mod layout_a;
pub mod layout_b;
pub mod layout_generic;
pub mod math_check;
pub mod tax;

pub use export::{ExportResult, ExportService};
pub use formatter::{format, format_named, ExportOutput, Layout};
pub use math_check::{check_math, EntryCheck, MathCheck};
