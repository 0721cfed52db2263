use std::sync::Arc;

use chrono::Utc;

use super::error::ErrorCode;
use super::ids::{MediaAssetId, UserId};
use super::media::{MediaAsset, MediaType};
use super::media_service::{MediaService, UploadMetadata};
use super::ports::{MockMediaRepository, MockObjectStore, ObjectStoreError};

fn store() -> MockObjectStore {
    let mut store = MockObjectStore::new();
    store.expect_bucket().return_const("media".to_owned());
    store
        .expect_signed_upload_url()
        .returning(|key, _, _| Ok(format!("https://store.test/put/{key}")));
    store
        .expect_public_url()
        .returning(|key| format!("https://store.test/{key}"));
    store
}

fn service(media: MockMediaRepository, store: MockObjectStore) -> MediaService {
    MediaService::new(Arc::new(media), Arc::new(store))
}

fn owned_asset(owner: UserId, id: MediaAssetId) -> MediaAsset {
    MediaAsset {
        id,
        owner_user_id: owner,
        media_type: MediaType::Image,
        bucket: "media".into(),
        storage_key: format!("{owner}/{id}.png"),
        content_type: "image/png".into(),
        byte_size: None,
        width: None,
        height: None,
        duration_seconds: None,
        created_at: Utc::now(),
    }
}

#[actix_rt::test]
async fn upload_ticket_carries_owner_scoped_key() {
    let user = UserId::random();
    let mut media = MockMediaRepository::new();
    media
        .expect_insert()
        .withf(move |asset| {
            asset.storage_key.starts_with(&format!("{user}/"))
                && asset.storage_key.ends_with(".png")
        })
        .returning(|_| Ok(()));

    let ticket = service(media, store())
        .create_upload_url(user, "avatar.PNG", MediaType::Image, "image/png", None)
        .await
        .expect("issues ticket");
    assert!(ticket.upload_url.contains(&ticket.asset.storage_key));
    assert!(ticket.public_url.contains(&ticket.asset.storage_key));
}

#[actix_rt::test]
async fn mismatched_content_type_is_rejected() {
    let err = service(MockMediaRepository::new(), MockObjectStore::new())
        .create_upload_url(
            UserId::random(),
            "movie.mp4",
            MediaType::Image,
            "video/mp4",
            None,
        )
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn confirm_is_owner_only() {
    let asset_id = MediaAssetId::random();
    let mut media = MockMediaRepository::new();
    media
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owned_asset(UserId::random(), asset_id))));

    let err = service(media, MockObjectStore::new())
        .confirm_upload(UserId::random(), asset_id, UploadMetadata::default())
        .await
        .expect_err("hidden from non-owners");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[actix_rt::test]
async fn confirm_patches_reported_metadata() {
    let user = UserId::random();
    let asset_id = MediaAssetId::random();
    let mut media = MockMediaRepository::new();
    media
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owned_asset(user, asset_id))));
    media
        .expect_update_upload_metadata()
        .withf(|asset| asset.width == Some(640) && asset.byte_size == Some(2048))
        .returning(|_| Ok(()));

    let metadata = UploadMetadata {
        byte_size: Some(2048),
        width: Some(640),
        height: Some(480),
        duration_seconds: None,
    };
    let asset = service(media, MockObjectStore::new())
        .confirm_upload(user, asset_id, metadata)
        .await
        .expect("patches");
    assert_eq!(asset.height, Some(480));
}

#[actix_rt::test]
async fn deletion_survives_store_failures() {
    let user = UserId::random();
    let asset_id = MediaAssetId::random();
    let mut media = MockMediaRepository::new();
    media
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owned_asset(user, asset_id))));
    media.expect_delete().returning(|_| Ok(()));
    let mut store = MockObjectStore::new();
    store
        .expect_delete_object()
        .returning(|_| Err(ObjectStoreError::connection("store down")));

    service(media, store)
        .delete_asset(user, asset_id)
        .await
        .expect("row removed despite store outage");
}
