//! Port abstraction for post persistence adapters.

use async_trait::async_trait;

use crate::domain::ids::{CompanyId, GroupId, MediaAssetId, PostId, UserId};
use crate::domain::media::MediaAsset;
use crate::domain::post::{ModerationStatus, Post};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Author filter for the personalised feed: published, approved posts by any
/// of the listed users or companies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedQuery {
    pub author_user_ids: Vec<UserId>,
    pub author_company_ids: Vec<CompanyId>,
}

impl FeedQuery {
    /// Whether the filter matches no authors at all.
    pub fn is_empty(&self) -> bool {
        self.author_user_ids.is_empty() && self.author_company_ids.is_empty()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and attach `media_ids` in order.
    async fn insert(
        &self,
        post: &Post,
        media_ids: &[MediaAssetId],
    ) -> Result<(), PostRepositoryError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Delete the post and its media links. Engagement rows cascade.
    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError>;

    async fn set_moderation_status(
        &self,
        id: PostId,
        status: ModerationStatus,
    ) -> Result<(), PostRepositoryError>;

    /// All posts authored by the user, any status, newest first.
    async fn list_by_author_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    async fn count_by_author_user(&self, user_id: UserId) -> Result<i64, PostRepositoryError>;

    /// Published, approved, non-group posts by the authors in `query`,
    /// newest publication first.
    async fn list_feed(
        &self,
        query: &FeedQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    async fn count_feed(&self, query: &FeedQuery) -> Result<i64, PostRepositoryError>;

    /// Published, approved, public, non-group posts, newest first.
    async fn list_public_feed(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    async fn count_public_feed(&self) -> Result<i64, PostRepositoryError>;

    /// Published, approved posts within a group, newest first.
    async fn list_group_feed(
        &self,
        group_id: GroupId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    async fn count_group_feed(&self, group_id: GroupId) -> Result<i64, PostRepositoryError>;

    /// Media attached to one post, in attachment order.
    async fn media_for_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<MediaAsset>, PostRepositoryError>;

    /// Media for a page of posts in one query, keyed by post.
    async fn media_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, MediaAsset)>, PostRepositoryError>;

    /// Replace the post's media set wholesale.
    async fn replace_media(
        &self,
        post_id: PostId,
        media_ids: &[MediaAssetId],
    ) -> Result<(), PostRepositoryError>;
}
