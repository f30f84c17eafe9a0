//! Bulk import of property records from uploaded spreadsheets.

pub mod aliases;
pub mod error;
pub mod format;
pub mod import;

pub use aliases::HeaderMap;
pub use error::ImportError;
pub use format::{read_rows, FileFormat};
pub use import::{import_bytes, FailedRow, ImportSummary, SkippedRow};
