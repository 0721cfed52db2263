use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::error::ErrorCode;
use super::ids::{MediaAssetId, UserId};
use super::media::{MediaAsset, MediaType};
use super::ports::{MockMediaRepository, MockProfileRepository};
use super::profile::{Profile, ProfileVisibility};
use super::profile_service::{ExperienceInput, ProfileService, UpdateProfileInput};

fn service(profiles: MockProfileRepository, media: MockMediaRepository) -> ProfileService {
    ProfileService::new(Arc::new(profiles), Arc::new(media))
}

fn image_asset(owner: UserId, id: MediaAssetId) -> MediaAsset {
    MediaAsset {
        id,
        owner_user_id: owner,
        media_type: MediaType::Image,
        bucket: "media".into(),
        storage_key: format!("{owner}/{id}.png"),
        content_type: "image/png".into(),
        byte_size: Some(1024),
        width: Some(128),
        height: Some(128),
        duration_seconds: None,
        created_at: Utc::now(),
    }
}

#[actix_rt::test]
async fn my_profile_is_created_on_first_access() {
    let user = UserId::random();
    let mut profiles = MockProfileRepository::new();
    profiles.expect_find_by_user().returning(|_| Ok(None));
    profiles
        .expect_insert()
        .withf(move |p| {
            p.owner.user_id() == Some(user) && p.visibility == ProfileVisibility::Public
        })
        .returning(|_| Ok(()));

    let profile = service(profiles, MockMediaRepository::new())
        .get_my_profile(user)
        .await
        .expect("creates profile");
    assert_eq!(profile.owner.user_id(), Some(user));
}

#[actix_rt::test]
async fn hidden_profile_is_forbidden_not_missing() {
    let owner = UserId::random();
    let mut profile = Profile::new_for_user(owner);
    profile.visibility = ProfileVisibility::Connections;
    let profile_id = profile.id;
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(profile.clone())));

    let err = service(profiles, MockMediaRepository::new())
        .get_profile(profile_id, Some(UserId::random()))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn update_rejects_unknown_tag_ids() {
    let user = UserId::random();
    let known = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_user()
        .returning(move |_| Ok(Some(Profile::new_for_user(user))));
    profiles
        .expect_known_tag_ids()
        .returning(move |_, _| Ok(vec![known]));

    let changes = UpdateProfileInput {
        skill_ids: Some(vec![known, unknown]),
        ..UpdateProfileInput::default()
    };
    let err = service(profiles, MockMediaRepository::new())
        .update_my_profile(user, changes)
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn update_applies_partial_changes() {
    let user = UserId::random();
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_by_user()
        .returning(move |_| Ok(Some(Profile::new_for_user(user))));
    profiles
        .expect_update()
        .withf(|p| {
            p.headline.as_deref() == Some("Fractional CTO") && p.about.is_none()
        })
        .returning(|_| Ok(()));

    let changes = UpdateProfileInput {
        headline: Some("Fractional CTO".into()),
        about: Some("   ".into()),
        ..UpdateProfileInput::default()
    };
    let profile = service(profiles, MockMediaRepository::new())
        .update_my_profile(user, changes)
        .await
        .expect("updates");
    assert_eq!(profile.headline.as_deref(), Some("Fractional CTO"));
    assert!(profile.about.is_none());
}

#[actix_rt::test]
async fn avatar_must_be_an_owned_image() {
    let user = UserId::random();
    let media_id = MediaAssetId::random();
    let mut media = MockMediaRepository::new();
    media.expect_find_by_id().returning(move |_| {
        let mut asset = image_asset(UserId::random(), media_id);
        asset.media_type = MediaType::Image;
        Ok(Some(asset))
    });

    let err = service(MockProfileRepository::new(), media)
        .update_avatar(user, media_id)
        .await
        .expect_err("not owned");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[actix_rt::test]
async fn avatar_rejects_non_image_media() {
    let user = UserId::random();
    let media_id = MediaAssetId::random();
    let mut media = MockMediaRepository::new();
    media.expect_find_by_id().returning(move |_| {
        let mut asset = image_asset(user, media_id);
        asset.media_type = MediaType::Video;
        Ok(Some(asset))
    });

    let err = service(MockProfileRepository::new(), media)
        .update_avatar(user, media_id)
        .await
        .expect_err("not an image");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn experience_dates_must_be_ordered() {
    let input = ExperienceInput {
        title: "Engineer".into(),
        organisation: "Initech".into(),
        description: None,
        started_at: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
        ended_at: NaiveDate::from_ymd_opt(2023, 5, 1),
        sort_order: None,
    };
    let err = service(MockProfileRepository::new(), MockMediaRepository::new())
        .add_experience(UserId::random(), input)
        .await
        .expect_err("invalid dates");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn experience_mutation_is_owner_only() {
    let owner = UserId::random();
    let intruder = UserId::random();
    let profile = Profile::new_for_user(owner);
    let profile_for_find = profile.clone();
    let experience = super::profile::Experience {
        id: super::ids::ExperienceId::random(),
        profile_id: profile.id,
        title: "Engineer".into(),
        organisation: "Initech".into(),
        description: None,
        started_at: NaiveDate::from_ymd_opt(2020, 1, 1).expect("date"),
        ended_at: None,
        sort_order: 0,
    };
    let experience_id = experience.id;
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_find_experience()
        .returning(move |_| Ok(Some(experience.clone())));
    profiles
        .expect_find_by_id()
        .returning(move |_| Ok(Some(profile_for_find.clone())));

    let err = service(profiles, MockMediaRepository::new())
        .delete_experience(intruder, experience_id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
