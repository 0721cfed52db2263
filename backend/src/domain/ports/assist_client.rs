//! Port abstraction for the content-assist provider.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by assist adapters.
    pub enum AssistError {
        /// No provider is configured.
        Disabled => "assist provider is not configured",
        /// The provider could not be reached or timed out.
        Unavailable { message: String } => "assist provider unavailable: {message}",
        /// The provider returned an unusable response.
        Malformed { message: String } => "assist response malformed: {message}",
    }
}

/// Moderation verdict for submitted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    Allow,
    Warn,
    Block,
}

/// Inputs for bio generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioRequest {
    pub display_name: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub tone: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistClient: Send + Sync {
    /// Whether a provider is configured at all.
    fn is_enabled(&self) -> bool;

    /// Draft an "about" section from profile facts.
    async fn generate_profile_bio(&self, request: &BioRequest)
    -> Result<String, AssistError>;

    /// Suggest alternative captions for a draft post body.
    async fn generate_post_captions(&self, content: &str)
    -> Result<Vec<String>, AssistError>;

    /// Suggest discoverability keywords for a draft post body.
    async fn suggest_keywords(&self, content: &str) -> Result<Vec<String>, AssistError>;

    /// Screen content before publication.
    async fn check_content(&self, content: &str)
    -> Result<ModerationDecision, AssistError>;
}
