//! Post authoring and lifecycle endpoints.
//!
//! List responses carry read-time engagement totals; the batched
//! [`with_counts`] helper keeps a page at two grouped queries.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::engagement_service::EngagementService;
use crate::domain::ids::{CompanyId, GroupId, MediaAssetId, PostId, UserId};
use crate::domain::media::MediaAsset;
use crate::domain::post::{ContentFormat, Post, PostKind, PostVisibility};
use crate::domain::post_service::{CreatePostInput, UpdatePostInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Post creation body. Omitted fields take the platform defaults: a plain
/// text post, publicly visible, published immediately.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Author as a company page instead of the calling user.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default = "default_kind")]
    pub kind: PostKind,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_markdown: Option<String>,
    #[serde(default = "default_format")]
    pub content_format: ContentFormat,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub link_title: Option<String>,
    #[serde(default)]
    pub link_description: Option<String>,
    #[serde(default)]
    pub link_image_url: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: PostVisibility,
    #[serde(default)]
    pub repost_of_post_id: Option<PostId>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media_ids: Vec<MediaAssetId>,
    #[serde(default = "default_publish_now")]
    pub publish_now: bool,
}

fn default_kind() -> PostKind {
    PostKind::Post
}

fn default_format() -> ContentFormat {
    ContentFormat::Plain
}

fn default_visibility() -> PostVisibility {
    PostVisibility::Public
}

const fn default_publish_now() -> bool {
    true
}

impl From<CreatePostRequest> for CreatePostInput {
    fn from(request: CreatePostRequest) -> Self {
        Self {
            company_id: request.company_id,
            group_id: request.group_id,
            kind: request.kind,
            content: request.content,
            content_markdown: request.content_markdown,
            content_format: request.content_format,
            link_url: request.link_url,
            link_title: request.link_title,
            link_description: request.link_description,
            link_image_url: request.link_image_url,
            visibility: request.visibility,
            repost_of_post_id: request.repost_of_post_id,
            scheduled_at: request.scheduled_at,
            media_ids: request.media_ids,
            publish_now: request.publish_now,
        }
    }
}

/// Partial post update. A provided media set replaces the old one.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_markdown: Option<String>,
    #[serde(default)]
    pub visibility: Option<PostVisibility>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub link_title: Option<String>,
    #[serde(default)]
    pub link_description: Option<String>,
    #[serde(default)]
    pub media_ids: Option<Vec<MediaAssetId>>,
}

impl From<UpdatePostRequest> for UpdatePostInput {
    fn from(request: UpdatePostRequest) -> Self {
        Self {
            content: request.content,
            content_markdown: request.content_markdown,
            visibility: request.visibility,
            link_url: request.link_url,
            link_title: request.link_title,
            link_description: request.link_description,
            media_ids: request.media_ids,
        }
    }
}

/// A post plus its read-time engagement totals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub reaction_count: i64,
    pub comment_count: i64,
}

/// Attach engagement totals to a page of posts; two grouped queries
/// regardless of page size.
pub(crate) async fn with_counts(
    engagement: &EngagementService,
    posts: Vec<Post>,
) -> Result<Vec<PostResponse>, Error> {
    let ids: Vec<PostId> = posts.iter().map(|post| post.id).collect();
    let counts = engagement.engagement_counts(&ids).await?;
    Ok(posts
        .into_iter()
        .map(|post| PostResponse {
            reaction_count: counts.reactions_for(post.id),
            comment_count: counts.comments_for(post.id),
            post,
        })
        .collect())
}

async fn single_response(
    engagement: &EngagementService,
    post: Post,
) -> Result<PostResponse, Error> {
    let reaction_count = engagement.reaction_count(post.id).await?;
    let comment_count = engagement.comment_count(post.id).await?;
    Ok(PostResponse {
        post,
        reaction_count,
        comment_count,
    })
}

/// Create a post as the caller or as a company page.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created post", body = PostResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a member of the company or group", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let post = state
        .posts
        .create_post(user_id, payload.into_inner().into())
        .await?;
    let response = single_response(&state.engagement, post).await?;
    Ok(HttpResponse::Created().json(response))
}

/// A post by id, visibility gated. Records a view event.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 403, description = "Not visible to the viewer", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<web::Json<PostResponse>> {
    let viewer = session.user_id()?;
    let post = state.posts.get_post(*id, viewer).await?;
    state.analytics.track_post_view(post.id, viewer).await;
    Ok(web::Json(single_response(&state.engagement, post).await?))
}

/// Partially update a post. Author only.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let user_id = session.require_user_id()?;
    let post = state
        .posts
        .update_post(user_id, *id, payload.into_inner().into())
        .await?;
    Ok(web::Json(single_response(&state.engagement, post).await?))
}

/// Delete a post. Author only.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.posts.delete_post(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Publish a draft or scheduled post now. Author only.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/publish",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Published post", body = PostResponse),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "publishPost"
)]
#[post("/posts/{id}/publish")]
pub async fn publish_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<web::Json<PostResponse>> {
    let user_id = session.require_user_id()?;
    let post = state.posts.publish_post(user_id, *id).await?;
    Ok(web::Json(single_response(&state.engagement, post).await?))
}

/// Archive a post. Author only.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/archive",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Archived post", body = PostResponse),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "archivePost"
)]
#[post("/posts/{id}/archive")]
pub async fn archive_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<web::Json<PostResponse>> {
    let user_id = session.require_user_id()?;
    let post = state.posts.archive_post(user_id, *id).await?;
    Ok(web::Json(single_response(&state.engagement, post).await?))
}

/// Media attached to a visible post, in display order.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/media",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Attached media", body = [MediaAsset]),
        (status = 403, description = "Not visible to the viewer", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "listPostMedia",
    security([])
)]
#[get("/posts/{id}/media")]
pub async fn list_post_media(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<web::Json<Vec<MediaAsset>>> {
    let viewer = session.user_id()?;
    Ok(web::Json(state.posts.post_media(*id, viewer).await?))
}

/// Posts authored by a user, per-item visibility filtered.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/posts",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses((status = 200, description = "Posts", body = Paginated<PostResponse>)),
    tags = ["posts"],
    operation_id = "listUserPosts",
    security([])
)]
#[get("/users/{id}/posts")]
pub async fn list_user_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PostResponse>>> {
    let viewer = session.user_id()?;
    let page = query.to_page()?;
    let posts = state.posts.list_posts_by_user(*id, viewer, page).await?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engagement_service::EngagementService;
    use crate::domain::ports::{
        MockAssistClient, MockCommentRepository, MockCompanyRepository, MockGroupRepository,
        MockMediaRepository, MockPostRepository, MockReactionRepository,
    };
    use crate::domain::post_service::PostService;
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn zero_count_engagement() -> EngagementService {
        let mut reactions = MockReactionRepository::new();
        reactions.expect_count_for_post().returning(|_| Ok(0));
        let mut comments = MockCommentRepository::new();
        comments.expect_count_for_post().returning(|_| Ok(0));
        EngagementService::new(
            Arc::new(reactions),
            Arc::new(comments),
            Arc::new(MockPostRepository::new()),
        )
    }

    fn test_app(
        posts: MockPostRepository,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut assist = MockAssistClient::new();
        assist.expect_is_enabled().return_const(false);

        let mut state = test_utils::empty_state();
        state.posts = Arc::new(PostService::new(
            Arc::new(posts),
            Arc::new(MockMediaRepository::new()),
            Arc::new(MockCompanyRepository::new()),
            Arc::new(MockGroupRepository::new()),
            Arc::new(assist),
        ));
        state.engagement = Arc::new(zero_count_engagement());
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(create_post)
                    .service(get_post)
                    .service(update_post)
                    .service(delete_post)
                    .service(publish_post),
            )
    }

    #[actix_web::test]
    async fn minimal_body_publishes_immediately() {
        let mut posts = MockPostRepository::new();
        posts.expect_insert().returning(|_, _| Ok(()));

        let app = actix_test::init_service(test_app(posts)).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .set_json(json!({ "content": "hello network" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("status").and_then(Value::as_str),
            Some("published")
        );
        assert!(body.get("publishedAt").and_then(Value::as_str).is_some());
        assert_eq!(body.get("reactionCount").and_then(Value::as_i64), Some(0));
    }

    #[actix_web::test]
    async fn empty_posts_are_rejected() {
        let app = actix_test::init_service(test_app(MockPostRepository::new())).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .set_json(json!({ "content": "   " }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_posts_are_not_found() {
        let mut posts = MockPostRepository::new();
        posts.expect_find_by_id().returning(|_| Ok(None));

        let app = actix_test::init_service(test_app(posts)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/posts/{}", PostId::random()))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn only_the_author_may_delete() {
        let author = UserId::random();
        let stranger = UserId::random();
        let post = sample_post(author);
        let post_id = post.id;
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));

        let app = actix_test::init_service(test_app(posts)).await;
        let cookie = test_utils::session_cookie(&app, stranger).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/posts/{post_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    fn sample_post(author: UserId) -> Post {
        use crate::domain::post::{ModerationStatus, PostAuthor, PostStatus};
        let now = Utc::now();
        Post {
            id: PostId::random(),
            author: PostAuthor::User(author),
            group_id: None,
            kind: PostKind::Post,
            status: PostStatus::Published,
            content_format: ContentFormat::Plain,
            content: Some("hello".into()),
            content_markdown: None,
            link_url: None,
            link_title: None,
            link_description: None,
            link_image_url: None,
            visibility: PostVisibility::Public,
            repost_of_post_id: None,
            moderation_status: ModerationStatus::Approved,
            scheduled_at: None,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }
}
