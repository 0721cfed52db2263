//! Writing assistance endpoints. Everything here is advisory; the caller
//! decides what to keep.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::BioRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Bio generation body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBioRequest {
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

impl From<GenerateBioRequest> for BioRequest {
    fn from(request: GenerateBioRequest) -> Self {
        Self {
            display_name: request.display_name,
            headline: request.headline,
            skills: request.skills,
            tone: request.tone,
        }
    }
}

/// Draft content to improve on.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub content: String,
}

/// A single generated text.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextResponse {
    pub text: String,
}

/// A list of generated alternatives.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Draft a profile bio from name, headline, and skills.
#[utoipa::path(
    post,
    path = "/api/v1/assist/profile-bio",
    request_body = GenerateBioRequest,
    responses(
        (status = 200, description = "Generated bio", body = TextResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Provider unavailable", body = crate::domain::Error)
    ),
    tags = ["assist"],
    operation_id = "generateProfileBio"
)]
#[post("/assist/profile-bio")]
pub async fn generate_profile_bio(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateBioRequest>,
) -> ApiResult<web::Json<TextResponse>> {
    session.require_user_id()?;
    let text = state
        .assist
        .generate_profile_bio(payload.into_inner().into())
        .await?;
    Ok(web::Json(TextResponse { text }))
}

/// Caption alternatives for a draft post.
#[utoipa::path(
    post,
    path = "/api/v1/assist/post-captions",
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Caption suggestions", body = SuggestionsResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Provider unavailable", body = crate::domain::Error)
    ),
    tags = ["assist"],
    operation_id = "generatePostCaptions"
)]
#[post("/assist/post-captions")]
pub async fn generate_post_captions(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ContentRequest>,
) -> ApiResult<web::Json<SuggestionsResponse>> {
    session.require_user_id()?;
    let suggestions = state
        .assist
        .generate_post_captions(&payload.content)
        .await?;
    Ok(web::Json(SuggestionsResponse { suggestions }))
}

/// Keyword suggestions for discoverability.
#[utoipa::path(
    post,
    path = "/api/v1/assist/keywords",
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Keyword suggestions", body = SuggestionsResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Provider unavailable", body = crate::domain::Error)
    ),
    tags = ["assist"],
    operation_id = "suggestKeywords"
)]
#[post("/assist/keywords")]
pub async fn suggest_keywords(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ContentRequest>,
) -> ApiResult<web::Json<SuggestionsResponse>> {
    session.require_user_id()?;
    let suggestions = state.assist.suggest_keywords(&payload.content).await?;
    Ok(web::Json(SuggestionsResponse { suggestions }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assist_service::AssistService;
    use crate::domain::ids::UserId;
    use crate::domain::ports::{AssistError, MockAssistClient};
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        client: MockAssistClient,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut state = test_utils::empty_state();
        state.assist = Arc::new(AssistService::new(Arc::new(client)));
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(generate_profile_bio)
                    .service(generate_post_captions)
                    .service(suggest_keywords),
            )
    }

    #[actix_web::test]
    async fn bios_require_a_session() {
        let app = actix_test::init_service(test_app(MockAssistClient::new())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/assist/profile-bio")
                .set_json(json!({ "displayName": "Ada" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn captions_come_back_as_a_list() {
        let mut client = MockAssistClient::new();
        client
            .expect_generate_post_captions()
            .returning(|_| Ok(vec!["short take".into(), "long take".into()]));

        let app = actix_test::init_service(test_app(client)).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/assist/post-captions")
                .cookie(cookie)
                .set_json(json!({ "content": "shipping a new feature today" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let suggestions = body
            .get("suggestions")
            .and_then(Value::as_array)
            .expect("list");
        assert_eq!(suggestions.len(), 2);
    }

    #[actix_web::test]
    async fn a_missing_provider_is_service_unavailable() {
        let mut client = MockAssistClient::new();
        client
            .expect_suggest_keywords()
            .returning(|_| Err(AssistError::disabled()));

        let app = actix_test::init_service(test_app(client)).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/assist/keywords")
                .cookie(cookie)
                .set_json(json!({ "content": "rust backend" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
