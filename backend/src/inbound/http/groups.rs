//! Group lifecycle and membership endpoints.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::group::{Group, GroupMember, GroupVisibility};
use crate::domain::group_service::CreateGroupInput;
use crate::domain::ids::GroupId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Group creation body. The slug derives from the name.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_visibility")]
    pub visibility: GroupVisibility,
}

fn default_visibility() -> GroupVisibility {
    GroupVisibility::Public
}

/// Create a group; the caller becomes its owner member.
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Created group", body = Group),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 409, description = "Name already taken", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "createGroup"
)]
#[post("/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGroupRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let CreateGroupRequest {
        name,
        description,
        visibility,
    } = payload.into_inner();
    let group = state
        .groups
        .create_group(
            user_id,
            CreateGroupInput {
                name,
                description,
                visibility,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(group))
}

/// A group by id.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    params(("id" = Uuid, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "getGroup",
    security([])
)]
#[get("/groups/{id}")]
pub async fn get_group(
    state: web::Data<HttpState>,
    id: web::Path<GroupId>,
) -> ApiResult<web::Json<Group>> {
    Ok(web::Json(state.groups.get_group(*id).await?))
}

/// Publicly visible groups.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    params(PageQuery),
    responses((status = 200, description = "Groups", body = Paginated<Group>)),
    tags = ["groups"],
    operation_id = "listGroups",
    security([])
)]
#[get("/groups")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Group>>> {
    let page = query.to_page()?;
    Ok(web::Json(state.groups.list_public_groups(page).await?.into()))
}

/// Groups the caller belongs to.
#[utoipa::path(
    get,
    path = "/api/v1/groups/mine",
    params(PageQuery),
    responses(
        (status = 200, description = "Member groups", body = Paginated<Group>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "listMyGroups"
)]
#[get("/groups/mine")]
pub async fn list_my_groups(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Group>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.groups.list_user_groups(user_id, page).await?.into(),
    ))
}

/// Join a group. Invite-only groups reject direct joins.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/join",
    params(("id" = Uuid, Path, description = "Group id")),
    responses(
        (status = 201, description = "Membership", body = GroupMember),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Invite only", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error),
        (status = 409, description = "Already a member", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "joinGroup"
)]
#[post("/groups/{id}/join")]
pub async fn join_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<GroupId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let member = state.groups.join_group(user_id, *id).await?;
    Ok(HttpResponse::Created().json(member))
}

/// Leave a group. The owner cannot leave their own group.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/leave",
    params(("id" = Uuid, Path, description = "Group id")),
    responses(
        (status = 204, description = "Left"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Owners cannot leave", body = crate::domain::Error),
        (status = 404, description = "Not a member", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "leaveGroup"
)]
#[post("/groups/{id}/leave")]
pub async fn leave_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<GroupId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.groups.leave_group(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Members of a group.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/members",
    params(("id" = Uuid, Path, description = "Group id"), PageQuery),
    responses(
        (status = 200, description = "Members", body = Paginated<GroupMember>),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["groups"],
    operation_id = "listGroupMembers",
    security([])
)]
#[get("/groups/{id}/members")]
pub async fn list_group_members(
    state: web::Data<HttpState>,
    id: web::Path<GroupId>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<GroupMember>>> {
    let page = query.to_page()?;
    Ok(web::Json(state.groups.list_members(*id, page).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::GroupMemberRole;
    use crate::domain::group_service::GroupService;
    use crate::domain::ids::UserId;
    use crate::domain::ports::MockGroupRepository;
    use crate::inbound::http::test_utils;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn test_app(
        groups: MockGroupRepository,
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
        state.groups = Arc::new(GroupService::new(Arc::new(groups)));
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_utils::test_session_middleware())
            .service(test_utils::seed_session)
            .service(
                web::scope("/api/v1")
                    .service(create_group)
                    .service(list_groups)
                    .service(list_my_groups)
                    .service(get_group)
                    .service(join_group)
                    .service(leave_group)
                    .service(list_group_members),
            )
    }

    fn public_group(owner: UserId) -> Group {
        Group::new(
            "Rust Developers".into(),
            "rust-developers".into(),
            None,
            GroupVisibility::Public,
            owner,
        )
    }

    #[actix_web::test]
    async fn creation_makes_the_caller_the_owner() {
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_slug().returning(|_| Ok(None));
        groups
            .expect_insert()
            .withf(|_, owner| owner.role == GroupMemberRole::Owner)
            .returning(|_, _| Ok(()));

        let app = actix_test::init_service(test_app(groups)).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/groups")
                .cookie(cookie)
                .set_json(json!({ "name": "Rust Developers" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("slug").and_then(Value::as_str),
            Some("rust-developers")
        );
        assert_eq!(
            body.get("visibility").and_then(Value::as_str),
            Some("public")
        );
    }

    #[actix_web::test]
    async fn invite_only_groups_reject_direct_joins() {
        let group = Group::new(
            "Insiders".into(),
            "insiders".into(),
            None,
            GroupVisibility::InviteOnly,
            UserId::random(),
        );
        let group_id = group.id;
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));

        let app = actix_test::init_service(test_app(groups)).await;
        let cookie = test_utils::session_cookie(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/groups/{group_id}/join"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn owners_cannot_leave_their_group() {
        let owner = UserId::random();
        let group = public_group(owner);
        let group_id = group.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_membership().returning(move |g, u| {
            Ok(Some(GroupMember {
                group_id: g,
                user_id: u,
                role: GroupMemberRole::Owner,
                joined_at: Utc::now(),
            }))
        });

        let app = actix_test::init_service(test_app(groups)).await;
        let cookie = test_utils::session_cookie(&app, owner).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/groups/{group_id}/leave"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn member_listing_is_public() {
        let group = public_group(UserId::random());
        let group_id = group.id;
        let owner_member = GroupMember {
            group_id,
            user_id: group.owner_user_id,
            role: GroupMemberRole::Owner,
            joined_at: Utc::now(),
        };
        let mut groups = MockGroupRepository::new();
        groups
            .expect_find_by_id()
            .returning(move |_| Ok(Some(group.clone())));
        groups
            .expect_list_members()
            .returning(move |_, _, _| Ok(vec![owner_member.clone()]));
        groups.expect_count_members().returning(|_| Ok(1));

        let app = actix_test::init_service(test_app(groups)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/groups/{group_id}/members"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("total").and_then(Value::as_i64), Some(1));
        assert_eq!(
            body["data"][0].get("role").and_then(Value::as_str),
            Some("owner")
        );
    }
}
