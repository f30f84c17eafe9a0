use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    /// Network or TLS failure talking to the routing webhook.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from routing webhook")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The webhook answered, but not with one step per requested property.
    #[error("routing webhook returned {actual} steps for {expected} requested properties")]
    StepMismatch { expected: usize, actual: usize },

    #[error("no routing webhook configured and fallback routing is disabled")]
    NotConfigured,

    #[error("invalid routing webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
