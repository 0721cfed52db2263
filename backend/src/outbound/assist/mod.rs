//! Content-assist provider adapters.

mod http_client;

pub use http_client::{AssistClientConfig, HttpAssistClient};
