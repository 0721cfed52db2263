//! Diesel-backed reaction repository, including the type catalogue.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::engagement::{Reaction, ReactionTally, ReactionType};
use crate::domain::ids::{PostId, ReactionId, ReactionTypeId, UserId};
use crate::domain::ports::{ReactionRepository, ReactionRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::{ReactionRow, ReactionTypeRow};
use super::pool::DbPool;
use super::schema::{reaction_types, reactions};

#[derive(Clone)]
pub struct DieselReactionRepository {
    pool: DbPool,
}

impl DieselReactionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> ReactionRepositoryError {
    map_diesel_error(
        e,
        ReactionRepositoryError::query,
        ReactionRepositoryError::connection,
    )
}

#[async_trait]
impl ReactionRepository for DieselReactionRepository {
    async fn list_types_active(&self) -> Result<Vec<ReactionType>, ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        let rows = reaction_types::table
            .filter(reaction_types::is_active.eq(true))
            .order(reaction_types::key.asc())
            .select(ReactionTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(ReactionTypeRow::into_domain).collect())
    }

    async fn find_type_by_key(
        &self,
        key: &str,
    ) -> Result<Option<ReactionType>, ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        let row = reaction_types::table
            .filter(reaction_types::key.eq(key))
            .select(ReactionTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ReactionTypeRow::into_domain))
    }

    async fn find_by_user_and_post(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<Option<Reaction>, ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        let row = reactions::table
            .filter(reactions::user_id.eq(user_id.as_uuid()))
            .filter(reactions::target_post_id.eq(post_id.as_uuid()))
            .select(ReactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ReactionRow::into_domain))
    }

    async fn insert(&self, reaction: &Reaction) -> Result<(), ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        diesel::insert_into(reactions::table)
            .values(ReactionRow::from_domain(reaction))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error_with_unique(
                    e,
                    ReactionRepositoryError::query,
                    ReactionRepositoryError::connection,
                    ReactionRepositoryError::duplicate,
                )
            })?;
        Ok(())
    }

    async fn update_type(
        &self,
        id: ReactionId,
        reaction_type: ReactionTypeId,
    ) -> Result<(), ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        diesel::update(reactions::table.find(id.as_uuid()))
            .set(reactions::reaction_type_id.eq(reaction_type.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: ReactionId) -> Result<(), ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        diesel::delete(reactions::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn counts_by_type(
        &self,
        post_id: PostId,
    ) -> Result<Vec<ReactionTally>, ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        let rows: Vec<(ReactionTypeRow, i64)> = reactions::table
            .inner_join(reaction_types::table)
            .filter(reactions::target_post_id.eq(post_id.as_uuid()))
            .group_by(reaction_types::id)
            .select((
                ReactionTypeRow::as_select(),
                diesel::dsl::count(reactions::id),
            ))
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows
            .into_iter()
            .map(|(row, count)| ReactionTally {
                reaction_type: row.into_domain(),
                count,
            })
            .collect())
    }

    async fn count_for_post(&self, post_id: PostId) -> Result<i64, ReactionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        reactions::table
            .filter(reactions::target_post_id.eq(post_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn counts_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, i64)>, ReactionRepositoryError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ReactionRepositoryError::connection))?;

        let ids: Vec<Option<Uuid>> = post_ids.iter().map(|id| Some(id.as_uuid())).collect();
        let rows: Vec<(Option<Uuid>, i64)> = reactions::table
            .filter(reactions::target_post_id.eq_any(ids))
            .group_by(reactions::target_post_id)
            .select((reactions::target_post_id, diesel::dsl::count(reactions::id)))
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (PostId::from_uuid(id), count)))
            .collect())
    }
}
