//! Reaction and comment endpoints.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::engagement::{Comment, Reaction, ReactionTally, ReactionType};
use crate::domain::ids::{CommentId, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const COMMENTS_DEFAULT_LIMIT: i64 = 50;

/// Reaction selection body; `typeKey` names a catalogue entry such as
/// `like` or `celebrate`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    pub type_key: String,
}

/// Comment creation body. `parentCommentId` nests a reply.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<CommentId>,
}

/// Comment edit body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// The active reaction catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/reactions/types",
    responses((status = 200, description = "Reaction types", body = [ReactionType])),
    tags = ["engagement"],
    operation_id = "listReactionTypes",
    security([])
)]
#[get("/reactions/types")]
pub async fn list_reaction_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReactionType>>> {
    Ok(web::Json(state.engagement.list_reaction_types().await?))
}

/// React to a post. Re-reacting switches the type; the call is idempotent
/// per (user, post) pair, hence PUT.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}/reactions",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = ReactRequest,
    responses(
        (status = 200, description = "Current reaction", body = Reaction),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Post not visible", body = crate::domain::Error),
        (status = 404, description = "Post or reaction type not found", body = crate::domain::Error)
    ),
    tags = ["engagement"],
    operation_id = "reactToPost"
)]
#[put("/posts/{id}/reactions")]
pub async fn react_to_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
    payload: web::Json<ReactRequest>,
) -> ApiResult<web::Json<Reaction>> {
    let user_id = session.require_user_id()?;
    let reaction = state
        .engagement
        .add_reaction(user_id, *id, &payload.type_key)
        .await?;
    Ok(web::Json(reaction))
}

/// Withdraw the caller's reaction.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/reactions",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Reaction removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "No reaction to remove", body = crate::domain::Error)
    ),
    tags = ["engagement"],
    operation_id = "removeReaction"
)]
#[delete("/posts/{id}/reactions")]
pub async fn remove_reaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.engagement.remove_reaction(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Per-type reaction tallies for a post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/reactions",
    params(("id" = Uuid, Path, description = "Post id")),
    responses((status = 200, description = "Tallies", body = [ReactionTally])),
    tags = ["engagement"],
    operation_id = "listPostReactions",
    security([])
)]
#[get("/posts/{id}/reactions")]
pub async fn list_post_reactions(
    state: web::Data<HttpState>,
    id: web::Path<PostId>,
) -> ApiResult<web::Json<Vec<ReactionTally>>> {
    Ok(web::Json(state.engagement.post_reactions(*id).await?))
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Created comment", body = Comment),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Post not visible", body = crate::domain::Error),
        (status = 404, description = "Post not found", body = crate::domain::Error)
    ),
    tags = ["engagement"],
    operation_id = "createComment"
)]
#[post("/posts/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<PostId>,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let CreateCommentRequest {
        content,
        parent_comment_id,
    } = payload.into_inner();
    let comment = state
        .engagement
        .create_comment(user_id, *id, content, parent_comment_id)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Comments on a post, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id"), PageQuery),
    responses((status = 200, description = "Comments", body = Paginated<Comment>)),
    tags = ["engagement"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    id: web::Path<PostId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Comment>>> {
    let page = query.to_page_with_default(COMMENTS_DEFAULT_LIMIT)?;
    Ok(web::Json(
        state.engagement.list_comments(*id, page).await?.into(),
    ))
}

/// Edit a comment. Author only.
#[utoipa::path(
    patch,
    path = "/api/v1/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = Comment),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["engagement"],
    operation_id = "updateComment"
)]
#[patch("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<CommentId>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<Comment>> {
    let user_id = session.require_user_id()?;
    let comment = state
        .engagement
        .update_comment(user_id, *id, payload.into_inner().content)
        .await?;
    Ok(web::Json(comment))
}

/// Delete a comment. Author only.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not the author", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["engagement"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<CommentId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.engagement.delete_comment(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engagement_service::EngagementService;
    use crate::domain::ids::{ReactionTypeId, UserId};
    use crate::domain::ports::{
        MockCommentRepository, MockPostRepository, MockReactionRepository,
    };
    use crate::domain::post::{
        ContentFormat, ModerationStatus, Post, PostAuthor, PostKind, PostStatus, PostVisibility,
    };
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn visible_post() -> Post {
        let now = Utc::now();
        Post {
            id: PostId::random(),
            author: PostAuthor::User(UserId::random()),
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

    fn like_type() -> ReactionType {
        ReactionType {
            id: ReactionTypeId::random(),
            key: "like".into(),
            label: "Like".into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn test_app(
        engagement: EngagementService,
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
        state.engagement = Arc::new(engagement);
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(list_reaction_types)
                    .service(react_to_post)
                    .service(remove_reaction)
                    .service(list_post_reactions)
                    .service(create_comment)
                    .service(list_comments)
                    .service(update_comment)
                    .service(delete_comment),
            )
    }

    #[actix_web::test]
    async fn reacting_twice_switches_the_type() {
        let user = UserId::random();
        let post = visible_post();
        let post_id = post.id;
        let existing = Reaction::new_for_post(user, post_id, ReactionTypeId::random());

        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        let mut reactions = MockReactionRepository::new();
        let celebrate = ReactionType {
            key: "celebrate".into(),
            label: "Celebrate".into(),
            ..like_type()
        };
        let celebrate_id = celebrate.id;
        reactions
            .expect_find_type_by_key()
            .returning(move |_| Ok(Some(celebrate.clone())));
        reactions
            .expect_find_by_user_and_post()
            .returning(move |_, _| Ok(Some(existing.clone())));
        reactions.expect_update_type().returning(|_, _| Ok(()));

        let app = actix_test::init_service(test_app(EngagementService::new(
            Arc::new(reactions),
            Arc::new(MockCommentRepository::new()),
            Arc::new(posts),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, user).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/posts/{post_id}/reactions"))
                .cookie(cookie)
                .set_json(json!({ "typeKey": "celebrate" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("reactionTypeId").and_then(Value::as_str),
            Some(celebrate_id.to_string().as_str())
        );
    }

    #[actix_web::test]
    async fn unknown_reaction_types_are_not_found() {
        let post = visible_post();
        let post_id = post.id;
        let mut posts = MockPostRepository::new();
        posts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        let mut reactions = MockReactionRepository::new();
        reactions.expect_find_type_by_key().returning(|_| Ok(None));

        let app = actix_test::init_service(test_app(EngagementService::new(
            Arc::new(reactions),
            Arc::new(MockCommentRepository::new()),
            Arc::new(posts),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/posts/{post_id}/reactions"))
                .cookie(cookie)
                .set_json(json!({ "typeKey": "sparkle" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn comments_reject_empty_content() {
        let app = actix_test::init_service(test_app(EngagementService::new(
            Arc::new(MockReactionRepository::new()),
            Arc::new(MockCommentRepository::new()),
            Arc::new(MockPostRepository::new()),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/posts/{}/comments", PostId::random()))
                .cookie(cookie)
                .set_json(json!({ "content": "  " }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn only_the_author_may_edit_a_comment() {
        let comment = Comment::new(
            PostId::random(),
            UserId::random(),
            "original".into(),
            None,
        );
        let comment_id = comment.id;
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(comment.clone())));

        let app = actix_test::init_service(test_app(EngagementService::new(
            Arc::new(MockReactionRepository::new()),
            Arc::new(comments),
            Arc::new(MockPostRepository::new()),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/comments/{comment_id}"))
                .cookie(cookie)
                .set_json(json!({ "content": "edited" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn comment_pages_default_to_fifty() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_list_for_post()
            .withf(|_, offset, limit| *offset == 0 && *limit == 50)
            .returning(|_, _, _| Ok(Vec::new()));
        comments.expect_count_for_post().returning(|_| Ok(0));

        let app = actix_test::init_service(test_app(EngagementService::new(
            Arc::new(MockReactionRepository::new()),
            Arc::new(comments),
            Arc::new(MockPostRepository::new()),
        )))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/posts/{}/comments", PostId::random()))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("limit").and_then(Value::as_i64), Some(50));
    }
}
