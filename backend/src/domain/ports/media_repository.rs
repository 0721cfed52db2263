//! Port abstraction for media-asset persistence adapters.

use async_trait::async_trait;

use crate::domain::ids::{MediaAssetId, UserId};
use crate::domain::media::MediaAsset;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by media repository adapters.
    pub enum MediaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "media repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "media repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn insert(&self, asset: &MediaAsset) -> Result<(), MediaRepositoryError>;

    async fn find_by_id(
        &self,
        id: MediaAssetId,
    ) -> Result<Option<MediaAsset>, MediaRepositoryError>;

    /// Record dimensions and size reported after a completed upload.
    async fn update_upload_metadata(
        &self,
        asset: &MediaAsset,
    ) -> Result<(), MediaRepositoryError>;

    async fn delete(&self, id: MediaAssetId) -> Result<(), MediaRepositoryError>;

    /// Assets owned by the user, newest first.
    async fn list_for_owner(
        &self,
        owner: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MediaAsset>, MediaRepositoryError>;

    async fn count_for_owner(&self, owner: UserId) -> Result<i64, MediaRepositoryError>;
}
