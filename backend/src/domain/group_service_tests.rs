use std::sync::Arc;

use chrono::Utc;

use super::error::ErrorCode;
use super::group::{Group, GroupMember, GroupMemberRole, GroupVisibility};
use super::group_service::{CreateGroupInput, GroupService};
use super::ids::UserId;
use super::ports::MockGroupRepository;

fn service(groups: MockGroupRepository) -> GroupService {
    GroupService::new(Arc::new(groups))
}

fn input(name: &str) -> CreateGroupInput {
    CreateGroupInput {
        name: name.into(),
        description: None,
        visibility: GroupVisibility::Public,
    }
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

#[actix_rt::test]
async fn creation_slugifies_the_name_and_adds_the_owner() {
    let user = UserId::random();
    let mut groups = MockGroupRepository::new();
    groups.expect_find_by_slug().returning(|_| Ok(None));
    groups
        .expect_insert()
        .withf(move |group, owner| {
            group.slug == "rust-developers"
                && owner.user_id == user
                && owner.role == GroupMemberRole::Owner
        })
        .returning(|_, _| Ok(()));

    let group = service(groups)
        .create_group(user, input("Rust Developers"))
        .await
        .expect("creates");
    assert_eq!(group.slug, "rust-developers");
}

#[actix_rt::test]
async fn duplicate_slug_is_a_conflict() {
    let mut groups = MockGroupRepository::new();
    groups
        .expect_find_by_slug()
        .returning(|_| Ok(Some(public_group(UserId::random()))));

    let err = service(groups)
        .create_group(UserId::random(), input("Rust Developers"))
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn invite_only_groups_cannot_be_joined() {
    let mut group = public_group(UserId::random());
    group.visibility = GroupVisibility::InviteOnly;
    let group_id = group.id;
    let mut groups = MockGroupRepository::new();
    groups
        .expect_find_by_id()
        .returning(move |_| Ok(Some(group.clone())));

    let err = service(groups)
        .join_group(UserId::random(), group_id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn joining_twice_is_a_conflict() {
    let user = UserId::random();
    let group = public_group(UserId::random());
    let group_id = group.id;
    let mut groups = MockGroupRepository::new();
    groups
        .expect_find_by_id()
        .returning(move |_| Ok(Some(group.clone())));
    groups.expect_find_membership().returning(move |gid, uid| {
        Ok(Some(GroupMember {
            group_id: gid,
            user_id: uid,
            role: GroupMemberRole::Member,
            joined_at: Utc::now(),
        }))
    });

    let err = service(groups)
        .join_group(user, group_id)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn the_owner_cannot_leave() {
    let owner = UserId::random();
    let group = public_group(owner);
    let group_id = group.id;
    let mut groups = MockGroupRepository::new();
    groups.expect_find_membership().returning(move |gid, uid| {
        Ok(Some(GroupMember {
            group_id: gid,
            user_id: uid,
            role: GroupMemberRole::Owner,
            joined_at: Utc::now(),
        }))
    });

    let err = service(groups)
        .leave_group(owner, group_id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn leaving_without_membership_is_not_found() {
    let mut groups = MockGroupRepository::new();
    groups.expect_find_membership().returning(|_, _| Ok(None));

    let err = service(groups)
        .leave_group(UserId::random(), super::ids::GroupId::random())
        .await
        .expect_err("not found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
