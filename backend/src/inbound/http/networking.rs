//! Connection request and follow graph endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ids::{CompanyId, ConnectionId, UserId};
use crate::domain::networking::{Connection, Follow, FollowStats, FollowTarget};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Connection request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub recipient_id: UserId,
}

/// Answer to a pending connection request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub accept: bool,
}

/// Send a connection request to another user.
#[utoipa::path(
    post,
    path = "/api/v1/connections",
    request_body = ConnectRequest,
    responses(
        (status = 201, description = "Pending connection", body = Connection),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Recipient not found", body = crate::domain::Error),
        (status = 409, description = "A connection already exists", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "sendConnectionRequest"
)]
#[post("/connections")]
pub async fn send_connection_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ConnectRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let connection = state
        .networking
        .send_connection_request(user_id, payload.recipient_id)
        .await?;
    Ok(HttpResponse::Created().json(connection))
}

/// Accept or decline a pending request. Recipient only.
#[utoipa::path(
    post,
    path = "/api/v1/connections/{id}/respond",
    params(("id" = Uuid, Path, description = "Connection id")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Answered connection", body = Connection),
        (status = 400, description = "Already answered", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "respondToConnection"
)]
#[post("/connections/{id}/respond")]
pub async fn respond_to_connection(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ConnectionId>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<web::Json<Connection>> {
    let user_id = session.require_user_id()?;
    let connection = state
        .networking
        .respond_to_connection(user_id, *id, payload.accept)
        .await?;
    Ok(web::Json(connection))
}

/// Remove a connection edge; either endpoint may do so.
#[utoipa::path(
    delete,
    path = "/api/v1/connections/{id}",
    params(("id" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "removeConnection"
)]
#[delete("/connections/{id}")]
pub async fn remove_connection(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<ConnectionId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.networking.remove_connection(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's accepted connections.
#[utoipa::path(
    get,
    path = "/api/v1/connections",
    params(PageQuery),
    responses(
        (status = 200, description = "Connections", body = Paginated<Connection>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "listConnections"
)]
#[get("/connections")]
pub async fn list_connections(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Connection>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.networking.list_connections(user_id, page).await?.into(),
    ))
}

/// Incoming pending requests awaiting the caller's answer.
#[utoipa::path(
    get,
    path = "/api/v1/connections/pending",
    params(PageQuery),
    responses(
        (status = 200, description = "Incoming requests", body = Paginated<Connection>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "listPendingConnections"
)]
#[get("/connections/pending")]
pub async fn list_pending_connections(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Connection>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.networking.list_pending(user_id, page).await?.into(),
    ))
}

/// Outgoing requests the caller has sent and not yet had answered.
#[utoipa::path(
    get,
    path = "/api/v1/connections/sent",
    params(PageQuery),
    responses(
        (status = 200, description = "Outgoing requests", body = Paginated<Connection>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "listSentConnections"
)]
#[get("/connections/sent")]
pub async fn list_sent_connections(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Connection>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.networking.list_sent(user_id, page).await?.into(),
    ))
}

/// Follow a user.
#[utoipa::path(
    post,
    path = "/api/v1/follows/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 201, description = "Follow edge", body = Follow),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "User not found", body = crate::domain::Error),
        (status = 409, description = "Already following", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "followUser"
)]
#[post("/follows/users/{id}")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let follow = state.networking.follow_user(user_id, *id).await?;
    Ok(HttpResponse::Created().json(follow))
}

/// Stop following a user.
#[utoipa::path(
    delete,
    path = "/api/v1/follows/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Follow not found", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "unfollowUser"
)]
#[delete("/follows/users/{id}")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.networking.unfollow_user(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Follow a company page.
#[utoipa::path(
    post,
    path = "/api/v1/follows/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 201, description = "Follow edge", body = Follow),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Company not found", body = crate::domain::Error),
        (status = 409, description = "Already following", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "followCompany"
)]
#[post("/follows/companies/{id}")]
pub async fn follow_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<CompanyId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let follow = state.networking.follow_company(user_id, *id).await?;
    Ok(HttpResponse::Created().json(follow))
}

/// Stop following a company page.
#[utoipa::path(
    delete,
    path = "/api/v1/follows/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Follow not found", body = crate::domain::Error)
    ),
    tags = ["networking"],
    operation_id = "unfollowCompany"
)]
#[delete("/follows/companies/{id}")]
pub async fn unfollow_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<CompanyId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.networking.unfollow_company(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Followers of a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/followers",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses((status = 200, description = "Followers", body = Paginated<Follow>)),
    tags = ["networking"],
    operation_id = "listUserFollowers",
    security([])
)]
#[get("/users/{id}/followers")]
pub async fn list_user_followers(
    state: web::Data<HttpState>,
    id: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Follow>>> {
    let page = query.to_page()?;
    Ok(web::Json(
        state
            .networking
            .list_followers(FollowTarget::User(*id), page)
            .await?
            .into(),
    ))
}

/// Followers of a company page.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}/followers",
    params(("id" = Uuid, Path, description = "Company id"), PageQuery),
    responses((status = 200, description = "Followers", body = Paginated<Follow>)),
    tags = ["networking"],
    operation_id = "listCompanyFollowers",
    security([])
)]
#[get("/companies/{id}/followers")]
pub async fn list_company_followers(
    state: web::Data<HttpState>,
    id: web::Path<CompanyId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Follow>>> {
    let page = query.to_page()?;
    Ok(web::Json(
        state
            .networking
            .list_followers(FollowTarget::Company(*id), page)
            .await?
            .into(),
    ))
}

/// Users and companies a user follows.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/following",
    params(("id" = Uuid, Path, description = "User id"), PageQuery),
    responses((status = 200, description = "Follow edges", body = Paginated<Follow>)),
    tags = ["networking"],
    operation_id = "listFollowing",
    security([])
)]
#[get("/users/{id}/following")]
pub async fn list_following(
    state: web::Data<HttpState>,
    id: web::Path<UserId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Follow>>> {
    let page = query.to_page()?;
    Ok(web::Json(
        state.networking.list_following(*id, page).await?.into(),
    ))
}

/// Follower, following, and connection counts for a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/network-stats",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "Network counts", body = FollowStats)),
    tags = ["networking"],
    operation_id = "networkStats",
    security([])
)]
#[get("/users/{id}/network-stats")]
pub async fn network_stats(
    state: web::Data<HttpState>,
    id: web::Path<UserId>,
) -> ApiResult<web::Json<FollowStats>> {
    Ok(web::Json(state.networking.stats(*id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::networking::ConnectionStatus;
    use crate::domain::networking_service::NetworkingService;
    use crate::domain::ports::{
        MockCompanyRepository, MockConnectionRepository, MockFollowRepository, MockUserRepository,
    };
    use crate::domain::user::User;
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        networking: NetworkingService,
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
        state.networking = Arc::new(networking);
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(send_connection_request)
                    .service(respond_to_connection)
                    .service(remove_connection)
                    .service(list_pending_connections)
                    .service(list_sent_connections)
                    .service(list_connections)
                    .service(follow_user)
                    .service(unfollow_user)
                    .service(follow_company)
                    .service(unfollow_company)
                    .service(network_stats),
            )
    }

    fn service(
        connections: MockConnectionRepository,
        follows: MockFollowRepository,
        users: MockUserRepository,
    ) -> NetworkingService {
        NetworkingService::new(
            Arc::new(connections),
            Arc::new(follows),
            Arc::new(users),
            Arc::new(MockCompanyRepository::new()),
        )
    }

    fn fixture_user() -> User {
        User::new_registration("bob@example.com", "hashed".into(), "Bob".into(), None)
    }

    #[actix_web::test]
    async fn a_request_to_yourself_is_rejected() {
        let user = UserId::random();
        let app = actix_test::init_service(test_app(service(
            MockConnectionRepository::new(),
            MockFollowRepository::new(),
            MockUserRepository::new(),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, user).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/connections")
                .cookie(cookie)
                .set_json(json!({ "recipientId": user }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn duplicate_requests_conflict() {
        let recipient = fixture_user();
        let recipient_id = recipient.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(recipient.clone())));
        let mut connections = MockConnectionRepository::new();
        connections.expect_find_between().returning(move |a, b| {
            Ok(Some(Connection::new_request(a, b)))
        });

        let app = actix_test::init_service(test_app(service(
            connections,
            MockFollowRepository::new(),
            users,
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/connections")
                .cookie(cookie)
                .set_json(json!({ "recipientId": recipient_id }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn only_the_recipient_may_respond() {
        let connection = Connection::new_request(UserId::random(), UserId::random());
        let connection_id = connection.id;
        let mut connections = MockConnectionRepository::new();
        connections
            .expect_find_by_id()
            .returning(move |_| Ok(Some(connection.clone())));

        let app = actix_test::init_service(test_app(service(
            connections,
            MockFollowRepository::new(),
            MockUserRepository::new(),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/connections/{connection_id}/respond"))
                .cookie(cookie)
                .set_json(json!({ "accept": true }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn accepting_marks_the_connection() {
        let requester = UserId::random();
        let recipient = UserId::random();
        let connection = Connection::new_request(requester, recipient);
        let connection_id = connection.id;
        let mut connections = MockConnectionRepository::new();
        connections
            .expect_find_by_id()
            .returning(move |_| Ok(Some(connection.clone())));
        connections
            .expect_update_status()
            .withf(|_, status, _| *status == ConnectionStatus::Accepted)
            .returning(|_, _, _| Ok(()));

        let app = actix_test::init_service(test_app(service(
            connections,
            MockFollowRepository::new(),
            MockUserRepository::new(),
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, recipient).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/connections/{connection_id}/respond"))
                .cookie(cookie)
                .set_json(json!({ "accept": true }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("status").and_then(Value::as_str),
            Some("accepted")
        );
        assert!(body.get("respondedAt").and_then(Value::as_str).is_some());
    }

    #[actix_web::test]
    async fn following_twice_conflicts() {
        let target = fixture_user();
        let target_id = target.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        let mut follows = MockFollowRepository::new();
        follows.expect_find().returning(|follower, target| {
            Ok(Some(Follow::new(follower, target)))
        });

        let app = actix_test::init_service(test_app(service(
            MockConnectionRepository::new(),
            follows,
            users,
        )))
        .await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/follows/users/{target_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn stats_combine_the_three_counts() {
        let user = UserId::random();
        let mut follows = MockFollowRepository::new();
        follows.expect_count_followers().returning(|_| Ok(5));
        follows.expect_count_following().returning(|_| Ok(2));
        let mut connections = MockConnectionRepository::new();
        connections.expect_count_accepted().returning(|_| Ok(7));

        let app = actix_test::init_service(test_app(service(
            connections,
            follows,
            MockUserRepository::new(),
        )))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{user}/network-stats"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("followersCount").and_then(Value::as_i64), Some(5));
        assert_eq!(body.get("followingCount").and_then(Value::as_i64), Some(2));
        assert_eq!(
            body.get("connectionsCount").and_then(Value::as_i64),
            Some(7)
        );
    }
}
