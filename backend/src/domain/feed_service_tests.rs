use std::sync::Arc;

use super::feed_service::FeedService;
use super::group::{Group, GroupVisibility};
use super::ids::{CompanyId, UserId};
use super::pagination::Page;
use super::ports::{MockFollowRepository, MockGroupRepository, MockPostRepository};

fn service(
    posts: MockPostRepository,
    follows: MockFollowRepository,
    groups: MockGroupRepository,
) -> FeedService {
    FeedService::new(Arc::new(posts), Arc::new(follows), Arc::new(groups))
}

#[actix_rt::test]
async fn feed_always_includes_the_viewer_as_author() {
    let viewer = UserId::random();
    let mut follows = MockFollowRepository::new();
    follows.expect_followed_user_ids().returning(|_| Ok(vec![]));
    follows
        .expect_followed_company_ids()
        .returning(|_| Ok(vec![]));
    let mut posts = MockPostRepository::new();
    posts
        .expect_list_feed()
        .withf(move |query, _, _| {
            query.author_user_ids == vec![viewer] && query.author_company_ids.is_empty()
        })
        .returning(|_, _, _| Ok(vec![]));
    posts.expect_count_feed().returning(|_| Ok(0));

    let page = service(posts, follows, MockGroupRepository::new())
        .get_feed(viewer, Page::default())
        .await
        .expect("feed");
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 1);
}

#[actix_rt::test]
async fn feed_unions_followed_users_and_companies() {
    let viewer = UserId::random();
    let followed = UserId::random();
    let company = CompanyId::random();
    let mut follows = MockFollowRepository::new();
    follows
        .expect_followed_user_ids()
        .returning(move |_| Ok(vec![followed]));
    follows
        .expect_followed_company_ids()
        .returning(move |_| Ok(vec![company]));
    let mut posts = MockPostRepository::new();
    posts
        .expect_list_feed()
        .withf(move |query, _, _| {
            query.author_user_ids.contains(&followed)
                && query.author_user_ids.contains(&viewer)
                && query.author_company_ids == vec![company]
        })
        .returning(|_, _, _| Ok(vec![]));
    posts.expect_count_feed().returning(|_| Ok(0));

    service(posts, follows, MockGroupRepository::new())
        .get_feed(viewer, Page::default())
        .await
        .expect("feed");
}

#[actix_rt::test]
async fn private_group_feed_requires_membership() {
    let viewer = UserId::random();
    let group = Group::new(
        "Quiet Corner".into(),
        "quiet-corner".into(),
        None,
        GroupVisibility::Private,
        UserId::random(),
    );
    let group_id = group.id;
    let mut groups = MockGroupRepository::new();
    groups
        .expect_find_by_id()
        .returning(move |_| Ok(Some(group.clone())));
    groups.expect_find_membership().returning(|_, _| Ok(None));

    let err = service(
        MockPostRepository::new(),
        MockFollowRepository::new(),
        groups,
    )
    .get_group_feed(group_id, viewer, Page::default())
    .await
    .expect_err("forbidden");
    assert_eq!(err.code(), super::error::ErrorCode::Forbidden);
}
