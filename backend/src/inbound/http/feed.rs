//! Feed endpoints composed over the follow graph.

use actix_web::{get, web};
use uuid::Uuid;

use crate::domain::ids::GroupId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::posts::{PostResponse, with_counts};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The caller's personalised feed: posts from followed users and companies
/// plus their own, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    params(PageQuery),
    responses(
        (status = 200, description = "Personalised feed", body = Paginated<PostResponse>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["feed"],
    operation_id = "getFeed"
)]
#[get("/feed")]
pub async fn get_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let viewer = session.require_user_id()?;
    let page = query.to_page()?;
    let posts = state.feed.get_feed(viewer, page).await?;
    let total = posts.total;
    let number = posts.page;
    let limit = posts.limit;
    let data = with_counts(&state.engagement, posts.items).await?;
    Ok(web::Json(Paginated {
        data,
        total,
        page: number,
        limit,
    }))
}

/// Published public posts, no session required.
#[utoipa::path(
    get,
    path = "/api/v1/feed/public",
    params(PageQuery),
    responses((status = 200, description = "Public feed", body = Paginated<PostResponse>)),
    tags = ["feed"],
    operation_id = "getPublicFeed",
    security([])
)]
#[get("/feed/public")]
pub async fn get_public_feed(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let page = query.to_page()?;
    let posts = state.feed.get_public_feed(page).await?;
    let total = posts.total;
    let number = posts.page;
    let limit = posts.limit;
    let data = with_counts(&state.engagement, posts.items).await?;
    Ok(web::Json(Paginated {
        data,
        total,
        page: number,
        limit,
    }))
}

/// Posts within a group. Non-public groups require membership.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/feed",
    params(("id" = Uuid, Path, description = "Group id"), PageQuery),
    responses(
        (status = 200, description = "Group feed", body = Paginated<PostResponse>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a group member", body = crate::domain::Error),
        (status = 404, description = "Group not found", body = crate::domain::Error)
    ),
    tags = ["feed"],
    operation_id = "getGroupFeed"
)]
#[get("/groups/{id}/feed")]
pub async fn get_group_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<GroupId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let viewer = session.require_user_id()?;
    let page = query.to_page()?;
    let posts = state.feed.get_group_feed(*id, viewer, page).await?;
    let total = posts.total;
    let number = posts.page;
    let limit = posts.limit;
    let data = with_counts(&state.engagement, posts.items).await?;
    Ok(web::Json(Paginated {
        data,
        total,
        page: number,
        limit,
    }))
}
