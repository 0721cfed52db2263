//! Port abstraction for group persistence adapters.

use async_trait::async_trait;

use crate::domain::group::{Group, GroupMember, GroupMemberRole};
use crate::domain::ids::{GroupId, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}",
        /// A unique constraint rejected the write (duplicate slug/membership).
        Duplicate { message: String } => "group already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Insert a group together with its owner membership row.
    async fn insert(
        &self,
        group: &Group,
        owner_membership: &GroupMember,
    ) -> Result<(), GroupRepositoryError>;

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, GroupRepositoryError>;

    async fn update(&self, group: &Group) -> Result<(), GroupRepositoryError>;

    /// Publicly visible groups, newest first.
    async fn list_public(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Group>, GroupRepositoryError>;

    async fn count_public(&self) -> Result<i64, GroupRepositoryError>;

    /// Groups the user belongs to, newest membership first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Group>, GroupRepositoryError>;

    async fn count_for_user(&self, user_id: UserId) -> Result<i64, GroupRepositoryError>;

    async fn find_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<GroupMember>, GroupRepositoryError>;

    async fn insert_membership(&self, member: &GroupMember)
    -> Result<(), GroupRepositoryError>;

    async fn delete_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<bool, GroupRepositoryError>;

    async fn update_membership_role(
        &self,
        group_id: GroupId,
        user_id: UserId,
        role: GroupMemberRole,
    ) -> Result<(), GroupRepositoryError>;

    /// Members of a group, owners and admins first, then join time.
    async fn list_members(
        &self,
        group_id: GroupId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<GroupMember>, GroupRepositoryError>;

    async fn count_members(&self, group_id: GroupId) -> Result<i64, GroupRepositoryError>;
}
