//! Media upload tickets and asset lifecycle.
//!
//! Object bytes never pass through the server; clients PUT and GET against
//! time-limited signed URLs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::Error;
use super::ids::{MediaAssetId, UserId};
use super::media::{MediaAsset, MediaType};
use super::pagination::{Page, PageOf};
use super::ports::{MediaRepository, ObjectStore};

const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// A pending upload: the asset row plus the URLs the client needs.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTicket {
    pub asset: MediaAsset,
    pub upload_url: String,
    pub public_url: String,
}

/// Metadata reported by the client once the PUT completed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadMetadata {
    pub byte_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<i32>,
}

pub struct MediaService {
    media: Arc<dyn MediaRepository>,
    store: Arc<dyn ObjectStore>,
}

impl MediaService {
    pub fn new(media: Arc<dyn MediaRepository>, store: Arc<dyn ObjectStore>) -> Self {
        Self { media, store }
    }

    /// Create the asset row and a one-hour signed PUT URL for it.
    pub async fn create_upload_url(
        &self,
        user: UserId,
        filename: &str,
        media_type: MediaType,
        content_type: &str,
        byte_size: Option<i64>,
    ) -> Result<UploadTicket, Error> {
        if !media_type.accepts(content_type) {
            return Err(Error::invalid_request(format!(
                "content type {content_type} is not allowed for {} uploads",
                media_type.as_str()
            )));
        }

        let storage_key = format!("{user}/{}.{}", Uuid::new_v4(), extension_of(filename));
        let asset = MediaAsset {
            id: MediaAssetId::random(),
            owner_user_id: user,
            media_type,
            bucket: self.store.bucket().to_owned(),
            storage_key: storage_key.clone(),
            content_type: content_type.to_owned(),
            byte_size,
            width: None,
            height: None,
            duration_seconds: None,
            created_at: Utc::now(),
        };
        self.media.insert(&asset).await?;

        let upload_url = self
            .store
            .signed_upload_url(&storage_key, content_type, SIGNED_URL_TTL)?;
        let public_url = self.store.public_url(&storage_key);
        info!(asset_id = %asset.id, key = %storage_key, "issued upload ticket");
        Ok(UploadTicket {
            asset,
            upload_url,
            public_url,
        })
    }

    /// Patch dimensions and size after the client finished uploading.
    /// Other users' assets are reported as missing.
    pub async fn confirm_upload(
        &self,
        user: UserId,
        asset_id: MediaAssetId,
        metadata: UploadMetadata,
    ) -> Result<MediaAsset, Error> {
        let mut asset = self.owned_asset(user, asset_id).await?;
        if let Some(byte_size) = metadata.byte_size {
            asset.byte_size = Some(byte_size);
        }
        if let Some(width) = metadata.width {
            asset.width = Some(width);
        }
        if let Some(height) = metadata.height {
            asset.height = Some(height);
        }
        if let Some(duration) = metadata.duration_seconds {
            asset.duration_seconds = Some(duration);
        }
        self.media.update_upload_metadata(&asset).await?;
        Ok(asset)
    }

    /// A one-hour signed GET URL for the asset.
    pub async fn download_url(&self, asset_id: MediaAssetId) -> Result<String, Error> {
        let asset = self
            .media
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| Error::not_found("media asset not found"))?;
        Ok(self
            .store
            .signed_download_url(&asset.storage_key, SIGNED_URL_TTL)?)
    }

    /// Delete the asset row. The stored object is removed best-effort; a
    /// store failure is logged and the row still goes away.
    pub async fn delete_asset(&self, user: UserId, asset_id: MediaAssetId) -> Result<(), Error> {
        let asset = self.owned_asset(user, asset_id).await?;
        if let Err(err) = self.store.delete_object(&asset.storage_key).await {
            warn!(asset_id = %asset_id, error = %err, "object deletion failed, removing row anyway");
        }
        self.media.delete(asset_id).await?;
        Ok(())
    }

    pub async fn list_my_assets(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<MediaAsset>, Error> {
        let items = self
            .media
            .list_for_owner(user, page.offset(), page.limit())
            .await?;
        let total = self.media.count_for_owner(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    async fn owned_asset(
        &self,
        user: UserId,
        asset_id: MediaAssetId,
    ) -> Result<MediaAsset, Error> {
        let asset = self
            .media
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| Error::not_found("media asset not found"))?;
        if asset.owner_user_id != user {
            return Err(Error::not_found("media asset not found"));
        }
        Ok(asset)
    }
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or_else(|| "bin".to_owned())
}
