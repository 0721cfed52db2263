//! Reqwest-backed assist provider adapter.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! auth, timeout and HTTP error mapping, and JSON decoding into domain
//! values. When no provider is configured every call reports `Disabled` and
//! the services decide how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AssistClient, AssistError, BioRequest, ModerationDecision};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the assist provider.
#[derive(Debug, Clone)]
pub struct AssistClientConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl AssistClientConfig {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

struct Provider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

/// Assist adapter performing HTTP POST requests against one provider
/// endpoint. Built without configuration it stays permanently disabled.
pub struct HttpAssistClient {
    provider: Option<Provider>,
}

impl HttpAssistClient {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: AssistClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            provider: Some(Provider {
                client,
                endpoint: config.endpoint,
                api_key: config.api_key,
            }),
        })
    }

    /// An adapter with no provider behind it.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, AssistError>
    where
        Req: Serialize + Sync,
        Res: for<'de> Deserialize<'de>,
    {
        let provider = self.provider.as_ref().ok_or_else(AssistError::disabled)?;
        let url = provider
            .endpoint
            .join(path)
            .map_err(|e| AssistError::malformed(format!("invalid provider path {path}: {e}")))?;

        let response = provider
            .client
            .post(url)
            .bearer_auth(&provider.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AssistError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        response
            .json::<Res>()
            .await
            .map_err(|e| AssistError::malformed(e.to_string()))
    }
}

fn map_status_error(status: StatusCode) -> AssistError {
    if status.is_client_error() {
        AssistError::malformed(format!("provider rejected request: status {}", status.as_u16()))
    } else {
        AssistError::unavailable(format!("status {}", status.as_u16()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BioRequestDto<'a> {
    display_name: &'a str,
    headline: Option<&'a str>,
    skills: &'a [String],
    tone: Option<&'a str>,
}

#[derive(Deserialize)]
struct TextResponseDto {
    text: String,
}

#[derive(Serialize)]
struct ContentRequestDto<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct SuggestionsResponseDto {
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct ModerationResponseDto {
    decision: String,
}

impl ModerationResponseDto {
    fn into_domain(self) -> Result<ModerationDecision, AssistError> {
        match self.decision.as_str() {
            "allow" => Ok(ModerationDecision::Allow),
            "warn" => Ok(ModerationDecision::Warn),
            "block" => Ok(ModerationDecision::Block),
            other => Err(AssistError::malformed(format!(
                "unknown moderation decision: {other}"
            ))),
        }
    }
}

#[async_trait]
impl AssistClient for HttpAssistClient {
    fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    async fn generate_profile_bio(&self, request: &BioRequest) -> Result<String, AssistError> {
        let dto = BioRequestDto {
            display_name: &request.display_name,
            headline: request.headline.as_deref(),
            skills: &request.skills,
            tone: request.tone.as_deref(),
        };
        let response: TextResponseDto = self.post("v1/profile-bio", &dto).await?;
        Ok(response.text)
    }

    async fn generate_post_captions(&self, content: &str) -> Result<Vec<String>, AssistError> {
        let response: SuggestionsResponseDto = self
            .post("v1/post-captions", &ContentRequestDto { content })
            .await?;
        Ok(response.suggestions)
    }

    async fn suggest_keywords(&self, content: &str) -> Result<Vec<String>, AssistError> {
        let response: SuggestionsResponseDto = self
            .post("v1/keywords", &ContentRequestDto { content })
            .await?;
        Ok(response.suggestions)
    }

    async fn check_content(&self, content: &str) -> Result<ModerationDecision, AssistError> {
        let response: ModerationResponseDto = self
            .post("v1/moderation", &ContentRequestDto { content })
            .await?;
        response.into_domain()
    }
}
