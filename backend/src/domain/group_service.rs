//! Group lifecycle and membership.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::error::Error;
use super::group::{slugify, Group, GroupMember, GroupMemberRole, GroupVisibility};
use super::ids::{GroupId, UserId};
use super::pagination::{Page, PageOf};
use super::ports::GroupRepository;

/// Group creation fields.
#[derive(Debug, Clone)]
pub struct CreateGroupInput {
    pub name: String,
    pub description: Option<String>,
    pub visibility: GroupVisibility,
}

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    /// Create a group; the slug derives from the name and must be unique.
    pub async fn create_group(
        &self,
        user: UserId,
        input: CreateGroupInput,
    ) -> Result<Group, Error> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(Error::invalid_request(
                "name must contain at least one alphanumeric character",
            ));
        }
        if self.groups.find_by_slug(&slug).await?.is_some() {
            return Err(Error::conflict("a group with this name already exists"));
        }

        let group = Group::new(
            name.to_owned(),
            slug,
            input.description,
            input.visibility,
            user,
        );
        let owner = GroupMember {
            group_id: group.id,
            user_id: user,
            role: GroupMemberRole::Owner,
            joined_at: Utc::now(),
        };
        self.groups.insert(&group, &owner).await?;
        info!(group_id = %group.id, slug = %group.slug, "created group");
        Ok(group)
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Group, Error> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("group not found"))
    }

    /// Join a group. Invite-only groups cannot be joined directly.
    pub async fn join_group(&self, user: UserId, id: GroupId) -> Result<GroupMember, Error> {
        let group = self.get_group(id).await?;
        if group.visibility == GroupVisibility::InviteOnly {
            return Err(Error::forbidden("this group is invite only"));
        }
        if self.groups.find_membership(id, user).await?.is_some() {
            return Err(Error::conflict("you are already a member of this group"));
        }

        let member = GroupMember {
            group_id: id,
            user_id: user,
            role: GroupMemberRole::Member,
            joined_at: Utc::now(),
        };
        self.groups.insert_membership(&member).await?;
        Ok(member)
    }

    /// Leave a group. The owner cannot leave their own group.
    pub async fn leave_group(&self, user: UserId, id: GroupId) -> Result<(), Error> {
        let membership = self
            .groups
            .find_membership(id, user)
            .await?
            .ok_or_else(|| Error::not_found("you are not a member of this group"))?;
        if membership.role == GroupMemberRole::Owner {
            return Err(Error::forbidden("the owner cannot leave their own group"));
        }
        self.groups.delete_membership(id, user).await?;
        Ok(())
    }

    pub async fn list_members(
        &self,
        group_id: GroupId,
        page: Page,
    ) -> Result<PageOf<GroupMember>, Error> {
        self.get_group(group_id).await?;
        let items = self
            .groups
            .list_members(group_id, page.offset(), page.limit())
            .await?;
        let total = self.groups.count_members(group_id).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn list_user_groups(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<Group>, Error> {
        let items = self
            .groups
            .list_for_user(user, page.offset(), page.limit())
            .await?;
        let total = self.groups.count_for_user(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn list_public_groups(&self, page: Page) -> Result<PageOf<Group>, Error> {
        let items = self
            .groups
            .list_public(page.offset(), page.limit())
            .await?;
        let total = self.groups.count_public().await?;
        Ok(PageOf::new(items, total, page))
    }
}
