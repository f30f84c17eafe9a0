pub mod assemble;
pub mod error;
pub mod fallback;
pub mod maps;
pub mod webhook;

pub use assemble::{build_steps, fallback_plan, RouteAssembler};
pub use error::RoutingError;
pub use webhook::{RouteWebhookClient, WebhookPayload, WebhookResponse, WebhookStep};
