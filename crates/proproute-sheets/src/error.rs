use thiserror::Error;

/// Errors returned by the spreadsheet client and property store.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid spreadsheet base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The record to append failed validation.
    #[error(transparent)]
    Invalid(#[from] proproute_core::CoreError),
}
