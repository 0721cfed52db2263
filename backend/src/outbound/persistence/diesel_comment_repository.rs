//! Diesel-backed comment repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::engagement::Comment;
use crate::domain::ids::{CommentId, PostId};
use crate::domain::ports::{CommentRepository, CommentRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::CommentRow;
use super::pool::DbPool;
use super::schema::comments;

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> CommentRepositoryError {
    map_diesel_error(
        e,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        diesel::insert_into(comments::table)
            .values(CommentRow::from_domain(comment))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        let row = comments::table
            .find(id.as_uuid())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(CommentRow::into_domain))
    }

    async fn update(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        diesel::update(comments::table.find(comment.id.as_uuid()))
            .set((
                comments::content.eq(&comment.content),
                comments::updated_at.eq(comment.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        diesel::delete(comments::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_for_post(
        &self,
        post_id: PostId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        let rows = comments::table
            .filter(comments::post_id.eq(post_id.as_uuid()))
            .order(comments::created_at.asc())
            .offset(offset)
            .limit(limit)
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(CommentRow::into_domain).collect())
    }

    async fn count_for_post(&self, post_id: PostId) -> Result<i64, CommentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        comments::table
            .filter(comments::post_id.eq(post_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn counts_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, i64)>, CommentRepositoryError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, CommentRepositoryError::connection))?;

        let ids: Vec<Uuid> = post_ids.iter().map(|id| id.as_uuid()).collect();
        let rows: Vec<(Uuid, i64)> = comments::table
            .filter(comments::post_id.eq_any(ids))
            .group_by(comments::post_id)
            .select((comments::post_id, diesel::dsl::count(comments::id)))
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, count)| (PostId::from_uuid(id), count))
            .collect())
    }
}
