//! Diesel-backed follow-graph repository.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ids::{CompanyId, UserId};
use crate::domain::networking::{Follow, FollowTarget};
use crate::domain::ports::{FollowRepository, FollowRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::FollowRow;
use super::pool::DbPool;
use super::schema::follows;

#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> FollowRepositoryError {
    map_diesel_error(
        e,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

fn into_follows(rows: Vec<FollowRow>) -> Result<Vec<Follow>, FollowRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(FollowRepositoryError::query))
        .collect()
}

/// Filter matching the exclusive target arc of a follow edge.
fn target_filter(target: FollowTarget) -> follows::BoxedQuery<'static, Pg> {
    match target {
        FollowTarget::User(id) => follows::table
            .into_boxed()
            .filter(follows::followed_user_id.eq(id.as_uuid())),
        FollowTarget::Company(id) => follows::table
            .into_boxed()
            .filter(follows::followed_company_id.eq(id.as_uuid())),
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert(&self, follow: &Follow) -> Result<(), FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        diesel::insert_into(follows::table)
            .values(FollowRow::from_domain(follow))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error_with_unique(
                    e,
                    FollowRepositoryError::query,
                    FollowRepositoryError::connection,
                    FollowRepositoryError::duplicate,
                )
            })?;
        Ok(())
    }

    async fn find(
        &self,
        follower: UserId,
        target: FollowTarget,
    ) -> Result<Option<Follow>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let row = target_filter(target)
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .select(FollowRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(|r| r.into_domain().map_err(FollowRepositoryError::query))
            .transpose()
    }

    async fn delete(
        &self,
        follower: UserId,
        target: FollowTarget,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let follower = follower.as_uuid();
        let deleted = match target {
            FollowTarget::User(id) => {
                diesel::delete(
                    follows::table
                        .filter(follows::follower_id.eq(follower))
                        .filter(follows::followed_user_id.eq(id.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
            FollowTarget::Company(id) => {
                diesel::delete(
                    follows::table
                        .filter(follows::follower_id.eq(follower))
                        .filter(follows::followed_company_id.eq(id.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(query_error)?;
        Ok(deleted > 0)
    }

    async fn followed_user_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let ids: Vec<Option<Uuid>> = follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .filter(follows::followed_user_id.is_not_null())
            .select(follows::followed_user_id)
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(ids.into_iter().flatten().map(UserId::from_uuid).collect())
    }

    async fn followed_company_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<CompanyId>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let ids: Vec<Option<Uuid>> = follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .filter(follows::followed_company_id.is_not_null())
            .select(follows::followed_company_id)
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(ids.into_iter().flatten().map(CompanyId::from_uuid).collect())
    }

    async fn count_followers(
        &self,
        target: FollowTarget,
    ) -> Result<i64, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        target_filter(target)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn count_following(&self, follower: UserId) -> Result<i64, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_followers(
        &self,
        target: FollowTarget,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Follow>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let rows = target_filter(target)
            .order(follows::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(FollowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_follows(rows)
    }

    async fn list_following(
        &self,
        follower: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Follow>, FollowRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, FollowRepositoryError::connection))?;

        let rows = follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .order(follows::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(FollowRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_follows(rows)
    }
}
