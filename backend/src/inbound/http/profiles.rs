//! Profile and work-history endpoints.
//!
//! `GET /profiles/me` creates the caller's profile lazily; public profile
//! reads accept anonymous viewers and record a view event.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ids::{ExperienceId, MediaAssetId, ProfileId, UserId};
use crate::domain::profile::{Experience, Profile, ProfileVisibility};
use crate::domain::profile_service::{ExperienceInput, UpdateProfileInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Partial profile update. Absent fields stay untouched; empty strings
/// clear the field.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub visibility: Option<ProfileVisibility>,
    #[serde(default)]
    pub skill_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub service_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub niche_ids: Option<Vec<Uuid>>,
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            headline: request.headline,
            about: request.about,
            location: request.location,
            website_url: request.website_url,
            visibility: request.visibility,
            skill_ids: request.skill_ids,
            service_ids: request.service_ids,
            niche_ids: request.niche_ids,
        }
    }
}

/// Body for avatar and banner updates.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    pub media_asset_id: MediaAssetId,
}

/// Work-history entry fields.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    pub title: String,
    pub organisation: String,
    #[serde(default)]
    pub description: Option<String>,
    pub started_at: NaiveDate,
    #[serde(default)]
    pub ended_at: Option<NaiveDate>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl From<ExperienceRequest> for ExperienceInput {
    fn from(request: ExperienceRequest) -> Self {
        Self {
            title: request.title,
            organisation: request.organisation,
            description: request.description,
            started_at: request.started_at,
            ended_at: request.ended_at,
            sort_order: request.sort_order,
        }
    }
}

/// The caller's own profile, created lazily on first access.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/me",
    responses(
        (status = 200, description = "Own profile", body = Profile),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "getMyProfile"
)]
#[get("/profiles/me")]
pub async fn get_my_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Profile>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.profiles.get_my_profile(user_id).await?))
}

/// Partially update the caller's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateMyProfile"
)]
#[patch("/profiles/me")]
pub async fn update_my_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<Profile>> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profiles
        .update_my_profile(user_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// Point the caller's avatar at an uploaded image.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me/avatar",
    request_body = MediaReference,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Not an owned image", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateAvatar"
)]
#[put("/profiles/me/avatar")]
pub async fn update_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MediaReference>,
) -> ApiResult<web::Json<Profile>> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profiles
        .update_avatar(user_id, payload.media_asset_id)
        .await?;
    Ok(web::Json(profile))
}

/// Point the caller's banner at an uploaded image.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me/banner",
    request_body = MediaReference,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Not an owned image", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateBanner"
)]
#[put("/profiles/me/banner")]
pub async fn update_banner(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<MediaReference>,
) -> ApiResult<web::Json<Profile>> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profiles
        .update_banner(user_id, payload.media_asset_id)
        .await?;
    Ok(web::Json(profile))
}

/// A profile by id, visibility gated. Records a view event.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 403, description = "Not visible to the viewer", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfile",
    security([])
)]
#[get("/profiles/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ProfileId>,
) -> ApiResult<web::Json<Profile>> {
    let viewer = session.user_id()?;
    let profile = state.profiles.get_profile(*id, viewer).await?;
    state.analytics.track_profile_view(profile.id, viewer).await;
    Ok(web::Json(profile))
}

/// A user's profile, visibility gated. Records a view event.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/profile",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 403, description = "Not visible to the viewer", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "getUserProfile",
    security([])
)]
#[get("/users/{id}/profile")]
pub async fn get_user_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<UserId>,
) -> ApiResult<web::Json<Profile>> {
    let viewer = session.user_id()?;
    let profile = state.profiles.get_profile_by_user(*id, viewer).await?;
    state.analytics.track_profile_view(profile.id, viewer).await;
    Ok(web::Json(profile))
}

/// Add a work-history entry to the caller's profile.
#[utoipa::path(
    post,
    path = "/api/v1/profiles/me/experiences",
    request_body = ExperienceRequest,
    responses(
        (status = 201, description = "Created experience", body = Experience),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "addExperience"
)]
#[post("/profiles/me/experiences")]
pub async fn add_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let experience = state
        .profiles
        .add_experience(user_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(experience))
}

/// Replace a work-history entry. Owner only.
#[utoipa::path(
    put,
    path = "/api/v1/profiles/me/experiences/{id}",
    params(("id" = Uuid, Path, description = "Experience id")),
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Updated experience", body = Experience),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "updateExperience"
)]
#[put("/profiles/me/experiences/{id}")]
pub async fn update_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ExperienceId>,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<web::Json<Experience>> {
    let user_id = session.require_user_id()?;
    let experience = state
        .profiles
        .update_experience(user_id, *id, payload.into_inner().into())
        .await?;
    Ok(web::Json(experience))
}

/// Remove a work-history entry. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/me/experiences/{id}",
    params(("id" = Uuid, Path, description = "Experience id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "deleteExperience"
)]
#[delete("/profiles/me/experiences/{id}")]
pub async fn delete_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ExperienceId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.profiles.delete_experience(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Work-history entries of a visible profile.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/experiences",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Experiences", body = [Experience]),
        (status = 403, description = "Not visible to the viewer", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["profiles"],
    operation_id = "listExperiences",
    security([])
)]
#[get("/profiles/{id}/experiences")]
pub async fn list_experiences(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ProfileId>,
) -> ApiResult<web::Json<Vec<Experience>>> {
    let viewer = session.user_id()?;
    let experiences = state.profiles.list_experiences(*id, viewer).await?;
    Ok(web::Json(experiences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics_service::AnalyticsService;
    use crate::domain::ports::{
        MockAnalyticsRepository, MockMediaRepository, MockProfileRepository,
    };
    use crate::domain::profile_service::ProfileService;
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        profiles: MockProfileRepository,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_insert().returning(|_| Ok(()));

        let mut state = test_utils::empty_state();
        state.profiles = Arc::new(ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockMediaRepository::new()),
        ));
        state.analytics = Arc::new(AnalyticsService::new(Arc::new(analytics)));
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(get_my_profile)
                    .service(update_my_profile)
                    .service(get_profile)
                    .service(get_user_profile)
                    .service(add_experience)
                    .service(list_experiences),
            )
    }

    #[actix_web::test]
    async fn first_access_creates_the_profile() {
        let user_id = UserId::random();
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));
        profiles.expect_insert().returning(|_| Ok(()));

        let app = actix_test::init_service(test_app(profiles)).await;
        let cookie = test_utils::session_cookie(&app, user_id).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/profiles/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("visibility").and_then(Value::as_str),
            Some("public")
        );
        assert_eq!(
            body.pointer("/owner/id").and_then(Value::as_str),
            Some(user_id.to_string().as_str())
        );
    }

    #[actix_web::test]
    async fn anonymous_viewers_read_public_profiles() {
        let profile = Profile::new_for_user(UserId::random());
        let profile_id = profile.id;
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_id()
            .returning(move |_| Ok(Some(profile.clone())));

        let app = actix_test::init_service(test_app(profiles)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/profiles/{profile_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn hidden_profiles_are_forbidden_to_strangers() {
        let mut profile = Profile::new_for_user(UserId::random());
        profile.visibility = ProfileVisibility::LoggedIn;
        let profile_id = profile.id;
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_id()
            .returning(move |_| Ok(Some(profile.clone())));

        let app = actix_test::init_service(test_app(profiles)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/profiles/{profile_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn experience_creation_requires_a_session() {
        let app = actix_test::init_service(test_app(MockProfileRepository::new())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/profiles/me/experiences")
                .set_json(json!({
                    "title": "Fractional CTO",
                    "organisation": "Consulting",
                    "startedAt": "2023-01-01"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn experiences_are_created_against_the_callers_profile() {
        let user_id = UserId::random();
        let profile = Profile::new_for_user(user_id);
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_user()
            .returning(move |_| Ok(Some(profile.clone())));
        profiles.expect_insert_experience().returning(|_| Ok(()));

        let app = actix_test::init_service(test_app(profiles)).await;
        let cookie = test_utils::session_cookie(&app, user_id).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/profiles/me/experiences")
                .cookie(cookie)
                .set_json(json!({
                    "title": "Fractional CTO",
                    "organisation": "Consulting",
                    "startedAt": "2023-01-01",
                    "endedAt": "2024-06-30"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("title").and_then(Value::as_str),
            Some("Fractional CTO")
        );
    }
}
