//! Direct messaging endpoints.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ids::{MessageId, ThreadId, UserId};
use crate::domain::messaging::{Message, MessageThread, ThreadParticipant};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const MESSAGES_DEFAULT_LIMIT: i64 = 50;

/// Thread creation body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub recipient_id: UserId,
}

/// Message body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
}

/// Read high-water mark body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub message_id: MessageId,
}

/// Open a direct thread with another user, or return the existing one.
#[utoipa::path(
    post,
    path = "/api/v1/messages/threads",
    request_body = CreateThreadRequest,
    responses(
        (status = 200, description = "Direct thread", body = MessageThread),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Recipient not found", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "createThread"
)]
#[post("/messages/threads")]
pub async fn create_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateThreadRequest>,
) -> ApiResult<web::Json<MessageThread>> {
    let user_id = session.require_user_id()?;
    let thread = state
        .messaging
        .create_direct_thread(user_id, payload.recipient_id)
        .await?;
    Ok(web::Json(thread))
}

/// The caller's threads, most recent activity first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/threads",
    params(PageQuery),
    responses(
        (status = 200, description = "Threads", body = Paginated<MessageThread>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "listThreads"
)]
#[get("/messages/threads")]
pub async fn list_threads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<MessageThread>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.messaging.list_threads(user_id, page).await?.into(),
    ))
}

/// Send a message into a thread. Participants only.
#[utoipa::path(
    post,
    path = "/api/v1/messages/threads/{id}",
    params(("id" = Uuid, Path, description = "Thread id")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Sent message", body = Message),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a participant", body = crate::domain::Error),
        (status = 404, description = "Thread not found", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "sendMessage"
)]
#[post("/messages/threads/{id}")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ThreadId>,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let message = state
        .messaging
        .send_message(user_id, *id, payload.into_inner().content)
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// Messages in a thread, newest first. Participants only.
#[utoipa::path(
    get,
    path = "/api/v1/messages/threads/{id}",
    params(("id" = Uuid, Path, description = "Thread id"), PageQuery),
    responses(
        (status = 200, description = "Messages", body = Paginated<Message>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a participant", body = crate::domain::Error),
        (status = 404, description = "Thread not found", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "listMessages"
)]
#[get("/messages/threads/{id}")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ThreadId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Message>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page_with_default(MESSAGES_DEFAULT_LIMIT)?;
    Ok(web::Json(
        state.messaging.list_messages(user_id, *id, page).await?.into(),
    ))
}

/// Record how far the caller has read in a thread.
#[utoipa::path(
    put,
    path = "/api/v1/messages/threads/{id}/read",
    params(("id" = Uuid, Path, description = "Thread id")),
    request_body = MarkReadRequest,
    responses(
        (status = 204, description = "Marker stored"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a participant", body = crate::domain::Error),
        (status = 404, description = "Thread not found", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "markThreadRead"
)]
#[put("/messages/threads/{id}/read")]
pub async fn mark_thread_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ThreadId>,
    payload: web::Json<MarkReadRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .messaging
        .mark_read(user_id, *id, payload.message_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Participants of a thread, including read markers. Participants only.
#[utoipa::path(
    get,
    path = "/api/v1/messages/threads/{id}/participants",
    params(("id" = Uuid, Path, description = "Thread id")),
    responses(
        (status = 200, description = "Participants", body = [ThreadParticipant]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a participant", body = crate::domain::Error),
        (status = 404, description = "Thread not found", body = crate::domain::Error)
    ),
    tags = ["messaging"],
    operation_id = "listThreadParticipants"
)]
#[get("/messages/threads/{id}/participants")]
pub async fn list_thread_participants(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ThreadId>,
) -> ApiResult<web::Json<Vec<ThreadParticipant>>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.messaging.participants(user_id, *id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging_service::MessagingService;
    use crate::domain::ports::{MockThreadRepository, MockUserRepository};
    use crate::domain::user::User;
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        threads: MockThreadRepository,
        users: MockUserRepository,
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
        state.messaging = Arc::new(MessagingService::new(Arc::new(threads), Arc::new(users)));
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(create_thread)
                    .service(list_threads)
                    .service(send_message)
                    .service(list_messages)
                    .service(mark_thread_read)
                    .service(list_thread_participants),
            )
    }

    fn fixture_user() -> User {
        User::new_registration("bob@example.com", "hashed".into(), "Bob".into(), None)
    }

    #[actix_web::test]
    async fn opening_a_thread_twice_returns_the_same_one() {
        let creator = UserId::random();
        let recipient = fixture_user();
        let recipient_id = recipient.id;
        let existing = MessageThread::new_direct(creator);
        let existing_id = existing.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(recipient.clone())));
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find_direct_between()
            .returning(move |_, _| Ok(Some(existing.clone())));

        let app = actix_test::init_service(test_app(threads, users)).await;
        let cookie = test_utils::session_cookie(&app, creator).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/messages/threads")
                .cookie(cookie)
                .set_json(json!({ "recipientId": recipient_id }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("id").and_then(Value::as_str),
            Some(existing_id.to_string().as_str())
        );
    }

    #[actix_web::test]
    async fn messaging_yourself_is_rejected() {
        let user = UserId::random();
        let app =
            actix_test::init_service(test_app(MockThreadRepository::new(), MockUserRepository::new()))
                .await;
        let cookie = test_utils::session_cookie(&app, user).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/messages/threads")
                .cookie(cookie)
                .set_json(json!({ "recipientId": user }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn non_participants_may_not_send() {
        let thread = MessageThread::new_direct(UserId::random());
        let thread_id = thread.id;
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        threads.expect_is_participant().returning(|_, _| Ok(false));

        let app = actix_test::init_service(test_app(threads, MockUserRepository::new())).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/messages/threads/{thread_id}"))
                .cookie(cookie)
                .set_json(json!({ "content": "psst" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn sending_touches_the_thread_timestamp() {
        let sender = UserId::random();
        let thread = MessageThread::new_direct(sender);
        let thread_id = thread.id;
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        threads.expect_is_participant().returning(|_, _| Ok(true));
        threads.expect_insert_message().returning(|_| Ok(()));
        threads
            .expect_touch_last_message()
            .times(1)
            .returning(|_, _| Ok(()));

        let app = actix_test::init_service(test_app(threads, MockUserRepository::new())).await;
        let cookie = test_utils::session_cookie(&app, sender).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/messages/threads/{thread_id}"))
                .cookie(cookie)
                .set_json(json!({ "content": "hello" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("content").and_then(Value::as_str), Some("hello"));
    }

    #[actix_web::test]
    async fn read_markers_return_no_content() {
        let reader = UserId::random();
        let thread = MessageThread::new_direct(reader);
        let thread_id = thread.id;
        let mut threads = MockThreadRepository::new();
        threads
            .expect_find_thread()
            .returning(move |_| Ok(Some(thread.clone())));
        threads.expect_is_participant().returning(|_, _| Ok(true));
        threads.expect_set_last_read().returning(|_, _, _| Ok(()));

        let app = actix_test::init_service(test_app(threads, MockUserRepository::new())).await;
        let cookie = test_utils::session_cookie(&app, reader).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/messages/threads/{thread_id}/read"))
                .cookie(cookie)
                .set_json(json!({ "messageId": MessageId::random() }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
