//! Port abstraction for comment persistence adapters.

use async_trait::async_trait;

use crate::domain::engagement::Comment;
use crate::domain::ids::{CommentId, PostId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    async fn find_by_id(&self, id: CommentId)
    -> Result<Option<Comment>, CommentRepositoryError>;

    async fn update(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Delete the comment; replies cascade.
    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError>;

    /// Comments on a post, oldest first within the page.
    async fn list_for_post(
        &self,
        post_id: PostId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    async fn count_for_post(&self, post_id: PostId)
    -> Result<i64, CommentRepositoryError>;

    /// Comment counts for a page of posts in one query.
    async fn counts_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, i64)>, CommentRepositoryError>;
}
