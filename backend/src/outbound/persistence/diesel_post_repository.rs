//! Diesel-backed post repository, including feed queries and media links.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ids::{GroupId, MediaAssetId, PostId, UserId};
use crate::domain::media::MediaAsset;
use crate::domain::post::{ModerationStatus, Post, PostStatus, PostVisibility};
use crate::domain::ports::{FeedQuery, PostRepository, PostRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MediaAssetRow, PostMediaRow, PostRow};
use super::pool::DbPool;
use super::schema::{media_assets, post_media, posts};

#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(e, PostRepositoryError::query, PostRepositoryError::connection)
}

fn into_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    row.into_domain().map_err(PostRepositoryError::query)
}

fn into_posts(rows: Vec<PostRow>) -> Result<Vec<Post>, PostRepositoryError> {
    rows.into_iter().map(into_post).collect()
}

fn media_rows(post_id: PostId, media_ids: &[MediaAssetId]) -> Vec<PostMediaRow> {
    media_ids
        .iter()
        .enumerate()
        .map(|(position, media_id)| PostMediaRow {
            post_id: post_id.into(),
            media_asset_id: (*media_id).into(),
            sort_order: position as i32,
        })
        .collect()
}

/// Published, non-removed, non-group posts by the given authors, restricted
/// to public or logged-in visibility. Connections-only posts never enter the
/// feed. NULL author columns never match the `Some` candidates, so the arc
/// stays exclusive.
fn feed_filter(query: &FeedQuery) -> posts::BoxedQuery<'static, Pg> {
    let user_ids: Vec<Option<Uuid>> = query
        .author_user_ids
        .iter()
        .map(|id| Some(id.as_uuid()))
        .collect();
    let company_ids: Vec<Option<Uuid>> = query
        .author_company_ids
        .iter()
        .map(|id| Some(id.as_uuid()))
        .collect();

    posts::table
        .into_boxed()
        .filter(posts::status.eq(PostStatus::Published.as_str()))
        .filter(posts::moderation_status.ne(ModerationStatus::Removed.as_str()))
        .filter(posts::visibility.eq_any([
            PostVisibility::Public.as_str(),
            PostVisibility::LoggedIn.as_str(),
        ]))
        .filter(posts::group_id.is_null())
        .filter(
            posts::author_user_id
                .eq_any(user_ids)
                .or(posts::author_company_id.eq_any(company_ids)),
        )
}

/// Published, non-removed, public posts outside any group.
fn public_feed_filter() -> posts::BoxedQuery<'static, Pg> {
    posts::table
        .into_boxed()
        .filter(posts::status.eq(PostStatus::Published.as_str()))
        .filter(posts::moderation_status.ne(ModerationStatus::Removed.as_str()))
        .filter(posts::visibility.eq(PostVisibility::Public.as_str()))
        .filter(posts::group_id.is_null())
}

/// Published, non-removed posts inside the group. Membership is checked by
/// the feed service before this query runs.
fn group_feed_filter(group_id: GroupId) -> posts::BoxedQuery<'static, Pg> {
    posts::table
        .into_boxed()
        .filter(posts::group_id.eq(group_id.as_uuid()))
        .filter(posts::status.eq(PostStatus::Published.as_str()))
        .filter(posts::moderation_status.ne(ModerationStatus::Removed.as_str()))
}

/// Published posts authored by the user. Drafts, scheduled, and archived
/// posts stay off the public author listing.
fn author_posts_filter(user_id: UserId) -> posts::BoxedQuery<'static, Pg> {
    posts::table
        .into_boxed()
        .filter(posts::author_user_id.eq(user_id.as_uuid()))
        .filter(posts::status.eq(PostStatus::Published.as_str()))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(
        &self,
        post: &Post,
        media_ids: &[MediaAssetId],
    ) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let post_row = PostRow::from_domain(post);
        let links = media_rows(post.id, media_ids);
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(posts::table)
                    .values(post_row)
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(post_media::table)
                        .values(links)
                        .execute(conn)
                        .await?;
                }
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let row = posts::table
            .find(id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(into_post).transpose()
    }

    async fn update(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        diesel::update(posts::table.find(post.id.as_uuid()))
            .set((
                posts::kind.eq(post.kind.as_str()),
                posts::status.eq(post.status.as_str()),
                posts::content_format.eq(post.content_format.as_str()),
                posts::content.eq(&post.content),
                posts::content_markdown.eq(&post.content_markdown),
                posts::link_url.eq(&post.link_url),
                posts::link_title.eq(&post.link_title),
                posts::link_description.eq(&post.link_description),
                posts::link_image_url.eq(&post.link_image_url),
                posts::visibility.eq(post.visibility.as_str()),
                posts::moderation_status.eq(post.moderation_status.as_str()),
                posts::scheduled_at.eq(post.scheduled_at),
                posts::published_at.eq(post.published_at),
                posts::updated_at.eq(post.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        diesel::delete(posts::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn set_moderation_status(
        &self,
        id: PostId,
        status: ModerationStatus,
    ) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        diesel::update(posts::table.find(id.as_uuid()))
            .set(posts::moderation_status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_by_author_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let rows = author_posts_filter(user_id)
            .order(posts::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_posts(rows)
    }

    async fn count_by_author_user(&self, user_id: UserId) -> Result<i64, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        author_posts_filter(user_id)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_feed(
        &self,
        query: &FeedQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let rows = feed_filter(query)
            .order(posts::published_at.desc())
            .offset(offset)
            .limit(limit)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_posts(rows)
    }

    async fn count_feed(&self, query: &FeedQuery) -> Result<i64, PostRepositoryError> {
        if query.is_empty() {
            return Ok(0);
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        feed_filter(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_public_feed(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let rows = public_feed_filter()
            .order(posts::published_at.desc())
            .offset(offset)
            .limit(limit)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_posts(rows)
    }

    async fn count_public_feed(&self) -> Result<i64, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        public_feed_filter()
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_group_feed(
        &self,
        group_id: GroupId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let rows = group_feed_filter(group_id)
            .order(posts::published_at.desc())
            .offset(offset)
            .limit(limit)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        into_posts(rows)
    }

    async fn count_group_feed(&self, group_id: GroupId) -> Result<i64, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        group_feed_filter(group_id)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn media_for_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<MediaAsset>, PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let rows = post_media::table
            .inner_join(media_assets::table)
            .filter(post_media::post_id.eq(post_id.as_uuid()))
            .order(post_media::sort_order.asc())
            .select(MediaAssetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(MediaAssetRow::into_domain).collect())
    }

    async fn media_for_posts(
        &self,
        post_ids: &[PostId],
    ) -> Result<Vec<(PostId, MediaAsset)>, PostRepositoryError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let ids: Vec<Uuid> = post_ids.iter().map(|id| id.as_uuid()).collect();
        let rows: Vec<(Uuid, MediaAssetRow)> = post_media::table
            .inner_join(media_assets::table)
            .filter(post_media::post_id.eq_any(ids))
            .order((post_media::post_id.asc(), post_media::sort_order.asc()))
            .select((post_media::post_id, MediaAssetRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows
            .into_iter()
            .map(|(post_id, row)| (PostId::from_uuid(post_id), row.into_domain()))
            .collect())
    }

    async fn replace_media(
        &self,
        post_id: PostId,
        media_ids: &[MediaAssetId],
    ) -> Result<(), PostRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PostRepositoryError::connection))?;

        let links = media_rows(post_id, media_ids);
        conn.transaction(|conn| {
            async move {
                diesel::delete(post_media::table.filter(post_media::post_id.eq(post_id.as_uuid())))
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(post_media::table)
                        .values(links)
                        .execute(conn)
                        .await?;
                }
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(query_error)?;
        Ok(())
    }
}
