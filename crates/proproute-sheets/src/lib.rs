pub mod client;
pub mod error;
pub mod normalize;
pub mod store;
pub mod types;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use normalize::{record_to_row, row_to_record};
pub use store::{PropertyStore, StoredProperty};
pub use types::{AppendResponse, ValueRange};
