//! View analytics endpoints.
//!
//! Reports are gated behind the same visibility rules as the entity
//! itself: whoever may read the profile or post may read its numbers.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::analytics::ViewAnalytics;
use crate::domain::ids::{PostId, ProfileId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Reporting window in days, 1 to 365. Defaults to 30.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DaysQuery {
    #[serde(default)]
    pub days: Option<i64>,
}

/// View totals for a profile over the reporting window.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}/analytics",
    params(("id" = Uuid, Path, description = "Profile id"), DaysQuery),
    responses(
        (status = 200, description = "View analytics", body = ViewAnalytics),
        (status = 400, description = "Invalid window", body = crate::domain::Error),
        (status = 403, description = "Profile not visible", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["analytics"],
    operation_id = "profileAnalytics"
)]
#[get("/profiles/{id}/analytics")]
pub async fn profile_analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ProfileId>,
    query: web::Query<DaysQuery>,
) -> ApiResult<web::Json<ViewAnalytics>> {
    let viewer = session.user_id()?;
    let profile = state.profiles.get_profile(*id, viewer).await?;
    let report = state.analytics.profile_analytics(profile.id, query.days).await?;
    Ok(web::Json(report))
}

/// View totals for a post over the reporting window.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/analytics",
    params(("id" = Uuid, Path, description = "Post id"), DaysQuery),
    responses(
        (status = 200, description = "View analytics", body = ViewAnalytics),
        (status = 400, description = "Invalid window", body = crate::domain::Error),
        (status = 403, description = "Post not visible", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["analytics"],
    operation_id = "postAnalytics"
)]
#[get("/posts/{id}/analytics")]
pub async fn post_analytics(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
    query: web::Query<DaysQuery>,
) -> ApiResult<web::Json<ViewAnalytics>> {
    let viewer = session.user_id()?;
    let post = state.posts.get_post(*id, viewer).await?;
    let report = state.analytics.post_analytics(post.id, query.days).await?;
    Ok(web::Json(report))
}
