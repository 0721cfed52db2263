//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, get, web};
use std::sync::Arc;

use crate::domain::analytics_service::AnalyticsService;
use crate::domain::assist_service::AssistService;
use crate::domain::auth_service::AuthService;
use crate::domain::company_service::CompanyService;
use crate::domain::engagement_service::EngagementService;
use crate::domain::feed_service::FeedService;
use crate::domain::group_service::GroupService;
use crate::domain::ids::UserId;
use crate::domain::media_service::MediaService;
use crate::domain::messaging_service::MessagingService;
use crate::domain::networking_service::NetworkingService;
use crate::domain::ports::{
    MockAnalyticsRepository, MockAssistClient, MockCommentRepository, MockCompanyRepository,
    MockConnectionRepository, MockFollowRepository, MockGroupRepository, MockMediaRepository,
    MockObjectStore, MockPasswordHasher, MockPostRepository, MockProfileRepository,
    MockReactionRepository, MockThreadRepository, MockUserRepository,
};
use crate::domain::post_service::PostService;
use crate::domain::profile_service::ProfileService;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A state bundle where every service sits on expectation-free mocks.
///
/// Tests replace the services they exercise; any call reaching an untouched
/// mock panics, which is the assertion we want.
pub fn empty_state() -> HttpState {
    HttpState {
        auth: Arc::new(AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockPasswordHasher::new()),
        )),
        profiles: Arc::new(ProfileService::new(
            Arc::new(MockProfileRepository::new()),
            Arc::new(MockMediaRepository::new()),
        )),
        companies: Arc::new(CompanyService::new(Arc::new(MockCompanyRepository::new()))),
        posts: Arc::new(PostService::new(
            Arc::new(MockPostRepository::new()),
            Arc::new(MockMediaRepository::new()),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockGroupRepository::new()),
            Arc::new(MockAssistClient::new()),
        )),
        feed: Arc::new(FeedService::new(
            Arc::new(MockPostRepository::new()),
            Arc::new(MockFollowRepository::new()),
            Arc::new(MockGroupRepository::new()),
        )),
        networking: Arc::new(NetworkingService::new(
            Arc::new(MockConnectionRepository::new()),
            Arc::new(MockFollowRepository::new()),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockCompanyRepository::new()),
        )),
        engagement: Arc::new(EngagementService::new(
            Arc::new(MockReactionRepository::new()),
            Arc::new(MockCommentRepository::new()),
            Arc::new(MockPostRepository::new()),
        )),
        messaging: Arc::new(MessagingService::new(
            Arc::new(MockThreadRepository::new()),
            Arc::new(MockUserRepository::new()),
        )),
        groups: Arc::new(GroupService::new(Arc::new(MockGroupRepository::new()))),
        media: Arc::new(MediaService::new(
            Arc::new(MockMediaRepository::new()),
            Arc::new(MockObjectStore::new()),
        )),
        analytics: Arc::new(AnalyticsService::new(Arc::new(
            MockAnalyticsRepository::new(),
        ))),
        assist: Arc::new(AssistService::new(Arc::new(MockAssistClient::new()))),
    }
}

/// Test-only route that mints a session for an arbitrary user id, so handler
/// tests get an authenticated cookie without exercising the auth stack.
#[get("/test-session/{id}")]
pub async fn seed_session(
    session: SessionContext,
    id: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    session.persist_user(*id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Log the given user in via [`seed_session`] and return the session cookie.
pub async fn session_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    user: UserId,
) -> Cookie<'static> {
    let request = actix_web::test::TestRequest::get()
        .uri(&format!("/test-session/{user}"))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
