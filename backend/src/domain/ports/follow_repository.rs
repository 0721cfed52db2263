//! Port abstraction for follow-graph persistence adapters.

use async_trait::async_trait;

use crate::domain::ids::{CompanyId, UserId};
use crate::domain::networking::{Follow, FollowTarget};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
        /// A unique constraint rejected the write (already following).
        Duplicate { message: String } => "follow already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn insert(&self, follow: &Follow) -> Result<(), FollowRepositoryError>;

    async fn find(
        &self,
        follower: UserId,
        target: FollowTarget,
    ) -> Result<Option<Follow>, FollowRepositoryError>;

    async fn delete(
        &self,
        follower: UserId,
        target: FollowTarget,
    ) -> Result<bool, FollowRepositoryError>;

    /// Users the follower subscribes to.
    async fn followed_user_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError>;

    /// Companies the follower subscribes to.
    async fn followed_company_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<CompanyId>, FollowRepositoryError>;

    /// How many users follow `target`.
    async fn count_followers(&self, target: FollowTarget)
    -> Result<i64, FollowRepositoryError>;

    /// How many edges the user has outgoing.
    async fn count_following(&self, follower: UserId)
    -> Result<i64, FollowRepositoryError>;

    /// Follower user ids of `target`, newest edge first.
    async fn list_followers(
        &self,
        target: FollowTarget,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Follow>, FollowRepositoryError>;

    /// Outgoing edges of `follower`, newest first.
    async fn list_following(
        &self,
        follower: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Follow>, FollowRepositoryError>;
}
