//! Port abstraction for reaction persistence adapters.

use async_trait::async_trait;

use crate::domain::engagement::{Reaction, ReactionTally, ReactionType};
use crate::domain::ids::{PostId, ReactionId, ReactionTypeId, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by reaction repository adapters.
    pub enum ReactionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reaction repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "reaction already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Active catalogue entries, ordered by key.
    async fn list_types_active(&self) -> Result<Vec<ReactionType>, ReactionRepositoryError>;

    async fn find_type_by_key(
        &self,
        key: &str,
    ) -> Result<Option<ReactionType>, ReactionRepositoryError>;

    /// The user's existing reaction to the post, if any.
    async fn find_by_user_and_post(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<Option<Reaction>, ReactionRepositoryError>;

    async fn insert(&self, reaction: &Reaction) -> Result<(), ReactionRepositoryError>;

    /// Switch an existing reaction to a different type.
    async fn update_type(
        &self,
        id: ReactionId,
        reaction_type: ReactionTypeId,
    ) -> Result<(), ReactionRepositoryError>;

    async fn delete(&self, id: ReactionId) -> Result<(), ReactionRepositoryError>;

    /// Per-type tallies for one post.
    async fn counts_by_type(
        &self,
        post_id: PostId,
    ) -> Result<Vec<ReactionTally>, ReactionRepositoryError>;

    async fn count_for_post(&self, post_id: PostId)
    -> Result<i64, ReactionRepositoryError>;

    /// Total reaction counts for a page of posts in one query.
    async fn counts_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, i64)>, ReactionRepositoryError>;
}
