//! Diesel-backed group repository.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::group::{Group, GroupMember, GroupMemberRole, GroupVisibility};
use crate::domain::ids::{GroupId, UserId};
use crate::domain::ports::{GroupRepository, GroupRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::{GroupMemberRow, GroupRow};
use super::pool::DbPool;
use super::schema::{group_members, groups};

#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> GroupRepositoryError {
    map_diesel_error(
        e,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

fn write_error(e: diesel::result::Error) -> GroupRepositoryError {
    map_diesel_error_with_unique(
        e,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
        GroupRepositoryError::duplicate,
    )
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn insert(
        &self,
        group: &Group,
        owner_membership: &GroupMember,
    ) -> Result<(), GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let group_row = GroupRow::from_domain(group);
        let member_row = GroupMemberRow::from_domain(owner_membership);
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(groups::table)
                    .values(group_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(group_members::table)
                    .values(member_row)
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(write_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let row = groups::table
            .find(id.as_uuid())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(GroupRow::into_domain))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let row = groups::table
            .filter(groups::slug.eq(slug))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(GroupRow::into_domain))
    }

    async fn update(&self, group: &Group) -> Result<(), GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        diesel::update(groups::table.find(group.id.as_uuid()))
            .set((
                groups::name.eq(&group.name),
                groups::description.eq(&group.description),
                groups::visibility.eq(group.visibility.as_str()),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_public(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let rows = groups::table
            .filter(groups::visibility.eq(GroupVisibility::Public.as_str()))
            .order(groups::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(GroupRow::into_domain).collect())
    }

    async fn count_public(&self) -> Result<i64, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        groups::table
            .filter(groups::visibility.eq(GroupVisibility::Public.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let rows = groups::table
            .inner_join(group_members::table)
            .filter(group_members::user_id.eq(user_id.as_uuid()))
            .order(group_members::joined_at.desc())
            .offset(offset)
            .limit(limit)
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(GroupRow::into_domain).collect())
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<i64, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        group_members::table
            .filter(group_members::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn find_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<GroupMember>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let row = group_members::table
            .find((group_id.as_uuid(), user_id.as_uuid()))
            .select(GroupMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(GroupMemberRow::into_domain))
    }

    async fn insert_membership(
        &self,
        member: &GroupMember,
    ) -> Result<(), GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        diesel::insert_into(group_members::table)
            .values(GroupMemberRow::from_domain(member))
            .execute(&mut conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    async fn delete_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<bool, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let deleted = diesel::delete(
            group_members::table.find((group_id.as_uuid(), user_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(query_error)?;
        Ok(deleted > 0)
    }

    async fn update_membership_role(
        &self,
        group_id: GroupId,
        user_id: UserId,
        role: GroupMemberRole,
    ) -> Result<(), GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        diesel::update(group_members::table.find((group_id.as_uuid(), user_id.as_uuid())))
            .set(group_members::role.eq(role.as_str()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_members(
        &self,
        group_id: GroupId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<GroupMember>, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        let rows = group_members::table
            .filter(group_members::group_id.eq(group_id.as_uuid()))
            .order((
                sql::<Integer>(
                    "case role when 'owner' then 0 when 'admin' then 1 else 2 end",
                )
                .asc(),
                group_members::joined_at.asc(),
            ))
            .offset(offset)
            .limit(limit)
            .select(GroupMemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(GroupMemberRow::into_domain).collect())
    }

    async fn count_members(&self, group_id: GroupId) -> Result<i64, GroupRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, GroupRepositoryError::connection))?;

        group_members::table
            .filter(group_members::group_id.eq(group_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }
}
