//! Diesel-backed media-asset repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ids::{MediaAssetId, UserId};
use crate::domain::media::MediaAsset;
use crate::domain::ports::{MediaRepository, MediaRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::MediaAssetRow;
use super::pool::DbPool;
use super::schema::media_assets;

#[derive(Clone)]
pub struct DieselMediaRepository {
    pool: DbPool,
}

impl DieselMediaRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> MediaRepositoryError {
    map_diesel_error(
        e,
        MediaRepositoryError::query,
        MediaRepositoryError::connection,
    )
}

#[async_trait]
impl MediaRepository for DieselMediaRepository {
    async fn insert(&self, asset: &MediaAsset) -> Result<(), MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        diesel::insert_into(media_assets::table)
            .values(MediaAssetRow::from_domain(asset))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: MediaAssetId,
    ) -> Result<Option<MediaAsset>, MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        let row = media_assets::table
            .find(id.as_uuid())
            .select(MediaAssetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(MediaAssetRow::into_domain))
    }

    async fn update_upload_metadata(
        &self,
        asset: &MediaAsset,
    ) -> Result<(), MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        diesel::update(media_assets::table.find(asset.id.as_uuid()))
            .set((
                media_assets::byte_size.eq(asset.byte_size),
                media_assets::width.eq(asset.width),
                media_assets::height.eq(asset.height),
                media_assets::duration_seconds.eq(asset.duration_seconds),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: MediaAssetId) -> Result<(), MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        diesel::delete(media_assets::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MediaAsset>, MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        let rows = media_assets::table
            .filter(media_assets::owner_user_id.eq(owner.as_uuid()))
            .order(media_assets::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(MediaAssetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(MediaAssetRow::into_domain).collect())
    }

    async fn count_for_owner(&self, owner: UserId) -> Result<i64, MediaRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, MediaRepositoryError::connection))?;

        media_assets::table
            .filter(media_assets::owner_user_id.eq(owner.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }
}
