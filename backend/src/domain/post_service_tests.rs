use std::sync::Arc;

use super::error::ErrorCode;
use super::ids::{PostId, UserId};
use super::ports::{
    AssistError, MockAssistClient, MockCompanyRepository, MockGroupRepository,
    MockMediaRepository, MockPostRepository, ModerationDecision,
};
use super::post::{
    ContentFormat, ModerationStatus, Post, PostAuthor, PostKind, PostStatus, PostVisibility,
};
use super::post_service::{CreatePostInput, PostService, UpdatePostInput};

fn input(content: &str) -> CreatePostInput {
    CreatePostInput {
        company_id: None,
        group_id: None,
        kind: PostKind::Post,
        content: Some(content.into()),
        content_markdown: None,
        content_format: ContentFormat::Plain,
        link_url: None,
        link_title: None,
        link_description: None,
        link_image_url: None,
        visibility: PostVisibility::Public,
        repost_of_post_id: None,
        scheduled_at: None,
        media_ids: Vec::new(),
        publish_now: true,
    }
}

fn disabled_assist() -> MockAssistClient {
    let mut assist = MockAssistClient::new();
    assist.expect_is_enabled().return_const(false);
    assist
}

fn service(posts: MockPostRepository, assist: MockAssistClient) -> PostService {
    PostService::new(
        Arc::new(posts),
        Arc::new(MockMediaRepository::new()),
        Arc::new(MockCompanyRepository::new()),
        Arc::new(MockGroupRepository::new()),
        Arc::new(assist),
    )
}

fn stored_post(author: UserId) -> Post {
    let now = chrono::Utc::now();
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

#[actix_rt::test]
async fn publish_now_sets_published_state() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_insert()
        .withf(|post, media| {
            post.status == PostStatus::Published && post.published_at.is_some() && media.is_empty()
        })
        .returning(|_, _| Ok(()));

    let post = service(posts, disabled_assist())
        .create_post(UserId::random(), input("hello world"))
        .await
        .expect("creates");
    assert_eq!(post.moderation_status, ModerationStatus::Approved);
}

#[actix_rt::test]
async fn empty_posts_are_rejected() {
    let mut create = input("   ");
    create.link_url = None;
    let err = service(MockPostRepository::new(), MockAssistClient::new())
        .create_post(UserId::random(), create)
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn blocked_content_is_stored_removed() {
    let mut assist = MockAssistClient::new();
    assist.expect_is_enabled().return_const(true);
    assist
        .expect_check_content()
        .returning(|_| Ok(ModerationDecision::Block));
    let mut posts = MockPostRepository::new();
    posts
        .expect_insert()
        .withf(|post, _| post.moderation_status == ModerationStatus::Removed)
        .returning(|_, _| Ok(()));

    let post = service(posts, assist)
        .create_post(UserId::random(), input("spam spam spam"))
        .await
        .expect("creates");
    assert_eq!(post.moderation_status, ModerationStatus::Removed);
}

#[actix_rt::test]
async fn warned_content_is_flagged() {
    let mut assist = MockAssistClient::new();
    assist.expect_is_enabled().return_const(true);
    assist
        .expect_check_content()
        .returning(|_| Ok(ModerationDecision::Warn));
    let mut posts = MockPostRepository::new();
    posts.expect_insert().returning(|_, _| Ok(()));

    let post = service(posts, assist)
        .create_post(UserId::random(), input("borderline"))
        .await
        .expect("creates");
    assert_eq!(post.moderation_status, ModerationStatus::Flagged);
}

#[actix_rt::test]
async fn screening_failure_approves_content() {
    let mut assist = MockAssistClient::new();
    assist.expect_is_enabled().return_const(true);
    assist
        .expect_check_content()
        .returning(|_| Err(AssistError::unavailable("timeout")));
    let mut posts = MockPostRepository::new();
    posts.expect_insert().returning(|_, _| Ok(()));

    let post = service(posts, assist)
        .create_post(UserId::random(), input("hello"))
        .await
        .expect("creates despite screening outage");
    assert_eq!(post.moderation_status, ModerationStatus::Approved);
}

#[actix_rt::test]
async fn update_is_author_only() {
    let author = UserId::random();
    let post = stored_post(author);
    let post_id = post.id;
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));

    let err = service(posts, disabled_assist())
        .update_post(UserId::random(), post_id, UpdatePostInput::default())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn hidden_post_read_is_forbidden() {
    let author = UserId::random();
    let mut post = stored_post(author);
    post.status = PostStatus::Draft;
    let post_id = post.id;
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));

    let err = service(posts, MockAssistClient::new())
        .get_post(post_id, Some(UserId::random()))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn archive_then_publish_round_trips() {
    let author = UserId::random();
    let post = stored_post(author);
    let post_id = post.id;
    let mut posts = MockPostRepository::new();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));
    posts.expect_update().returning(|_| Ok(()));
    let svc = service(posts, disabled_assist());

    let archived = svc.archive_post(author, post_id).await.expect("archives");
    assert_eq!(archived.status, PostStatus::Archived);
    let published = svc.publish_post(author, post_id).await.expect("publishes");
    assert_eq!(published.status, PostStatus::Published);
}

#[actix_rt::test]
async fn listing_filters_drafts_for_strangers() {
    let author = UserId::random();
    let mut draft = stored_post(author);
    draft.status = PostStatus::Draft;
    let published = stored_post(author);
    let both = vec![draft, published];
    let mut posts = MockPostRepository::new();
    posts
        .expect_list_by_author_user()
        .returning(move |_, _, _| Ok(both.clone()));
    posts.expect_count_by_author_user().returning(|_| Ok(2));

    let page = service(posts, MockAssistClient::new())
        .list_posts_by_user(author, Some(UserId::random()), super::pagination::Page::default())
        .await
        .expect("lists");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].status, PostStatus::Published);
}
