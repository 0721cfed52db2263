//! Advisory content generation endpoints.
//!
//! Unlike content screening, these surfaces are fail-closed: an unconfigured
//! or failing provider is reported to the caller as unavailable.

use std::sync::Arc;

use super::error::Error;
use super::ports::{AssistClient, BioRequest};

pub struct AssistService {
    client: Arc<dyn AssistClient>,
}

impl AssistService {
    pub fn new(client: Arc<dyn AssistClient>) -> Self {
        Self { client }
    }

    pub async fn generate_profile_bio(&self, request: BioRequest) -> Result<String, Error> {
        if request.display_name.trim().is_empty() {
            return Err(Error::invalid_request("displayName must not be empty"));
        }
        Ok(self.client.generate_profile_bio(&request).await?)
    }

    pub async fn generate_post_captions(&self, content: &str) -> Result<Vec<String>, Error> {
        require_content(content)?;
        Ok(self.client.generate_post_captions(content).await?)
    }

    pub async fn suggest_keywords(&self, content: &str) -> Result<Vec<String>, Error> {
        require_content(content)?;
        Ok(self.client.suggest_keywords(content).await?)
    }
}

fn require_content(content: &str) -> Result<(), Error> {
    if content.trim().is_empty() {
        return Err(Error::invalid_request("content must not be empty"));
    }
    Ok(())
}
