//! Profile reads, owner-only mutation, and work-history management.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use super::error::Error;
use super::ids::{ExperienceId, MediaAssetId, ProfileId, UserId};
use super::media::MediaType;
use super::ports::{MediaRepository, ProfileRepository};
use super::profile::{Experience, Profile, ProfileVisibility, TagKind};
use super::visibility::can_view_profile;

/// Partial profile update. Absent fields stay untouched; empty strings
/// clear the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub visibility: Option<ProfileVisibility>,
    pub skill_ids: Option<Vec<Uuid>>,
    pub service_ids: Option<Vec<Uuid>>,
    pub niche_ids: Option<Vec<Uuid>>,
}

/// Work-history entry fields.
#[derive(Debug, Clone)]
pub struct ExperienceInput {
    pub title: String,
    pub organisation: String,
    pub description: Option<String>,
    pub started_at: NaiveDate,
    pub ended_at: Option<NaiveDate>,
    pub sort_order: Option<i32>,
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    media: Arc<dyn MediaRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, media: Arc<dyn MediaRepository>) -> Self {
        Self { profiles, media }
    }

    /// The caller's own profile, created lazily as public on first access.
    pub async fn get_my_profile(&self, user_id: UserId) -> Result<Profile, Error> {
        if let Some(profile) = self.profiles.find_by_user(user_id).await? {
            return Ok(profile);
        }
        let profile = Profile::new_for_user(user_id);
        self.profiles.insert(&profile).await?;
        info!(user_id = %user_id, profile_id = %profile.id, "created profile on first access");
        Ok(profile)
    }

    /// A profile by id, gated by the visibility evaluator.
    pub async fn get_profile(
        &self,
        id: ProfileId,
        viewer: Option<UserId>,
    ) -> Result<Profile, Error> {
        let profile = self
            .profiles
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        if !can_view_profile(&profile, viewer.as_ref()) {
            return Err(Error::forbidden("you may not view this profile"));
        }
        Ok(profile)
    }

    /// A user's profile, gated by the visibility evaluator.
    pub async fn get_profile_by_user(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> Result<Profile, Error> {
        let profile = self
            .profiles
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        if !can_view_profile(&profile, viewer.as_ref()) {
            return Err(Error::forbidden("you may not view this profile"));
        }
        Ok(profile)
    }

    /// Apply a partial update to the caller's profile. Tag id sets are
    /// replaced wholesale and must reference existing catalogue rows.
    pub async fn update_my_profile(
        &self,
        user_id: UserId,
        changes: UpdateProfileInput,
    ) -> Result<Profile, Error> {
        let mut profile = self.get_my_profile(user_id).await?;

        if let Some(headline) = changes.headline {
            profile.headline = non_empty(headline);
        }
        if let Some(about) = changes.about {
            profile.about = non_empty(about);
        }
        if let Some(location) = changes.location {
            profile.location = non_empty(location);
        }
        if let Some(website_url) = changes.website_url {
            profile.website_url = non_empty(website_url);
        }
        if let Some(visibility) = changes.visibility {
            profile.visibility = visibility;
        }
        if let Some(ids) = changes.skill_ids {
            profile.skill_ids = self.validated_tag_ids(TagKind::Skill, ids).await?;
        }
        if let Some(ids) = changes.service_ids {
            profile.service_ids = self.validated_tag_ids(TagKind::Service, ids).await?;
        }
        if let Some(ids) = changes.niche_ids {
            profile.niche_ids = self.validated_tag_ids(TagKind::Niche, ids).await?;
        }

        profile.updated_at = Utc::now();
        self.profiles.update(&profile).await?;
        Ok(profile)
    }

    /// Point the profile's avatar at an uploaded image owned by the caller.
    pub async fn update_avatar(
        &self,
        user_id: UserId,
        media_id: MediaAssetId,
    ) -> Result<Profile, Error> {
        self.require_owned_image(user_id, media_id).await?;
        let mut profile = self.get_my_profile(user_id).await?;
        profile.avatar_media_id = Some(media_id);
        profile.updated_at = Utc::now();
        self.profiles.update(&profile).await?;
        Ok(profile)
    }

    /// Point the profile's banner at an uploaded image owned by the caller.
    pub async fn update_banner(
        &self,
        user_id: UserId,
        media_id: MediaAssetId,
    ) -> Result<Profile, Error> {
        self.require_owned_image(user_id, media_id).await?;
        let mut profile = self.get_my_profile(user_id).await?;
        profile.banner_media_id = Some(media_id);
        profile.updated_at = Utc::now();
        self.profiles.update(&profile).await?;
        Ok(profile)
    }

    pub async fn add_experience(
        &self,
        user_id: UserId,
        input: ExperienceInput,
    ) -> Result<Experience, Error> {
        validate_experience(&input)?;
        let profile = self.get_my_profile(user_id).await?;
        let experience = Experience {
            id: ExperienceId::random(),
            profile_id: profile.id,
            title: input.title,
            organisation: input.organisation,
            description: input.description,
            started_at: input.started_at,
            ended_at: input.ended_at,
            sort_order: input.sort_order.unwrap_or(0),
        };
        self.profiles.insert_experience(&experience).await?;
        Ok(experience)
    }

    pub async fn update_experience(
        &self,
        user_id: UserId,
        id: ExperienceId,
        input: ExperienceInput,
    ) -> Result<Experience, Error> {
        validate_experience(&input)?;
        let existing = self.owned_experience(user_id, id).await?;
        let experience = Experience {
            title: input.title,
            organisation: input.organisation,
            description: input.description,
            started_at: input.started_at,
            ended_at: input.ended_at,
            sort_order: input.sort_order.unwrap_or(existing.sort_order),
            ..existing
        };
        self.profiles.update_experience(&experience).await?;
        Ok(experience)
    }

    pub async fn delete_experience(
        &self,
        user_id: UserId,
        id: ExperienceId,
    ) -> Result<(), Error> {
        self.owned_experience(user_id, id).await?;
        self.profiles.delete_experience(id).await?;
        Ok(())
    }

    /// Experiences attached to a visible profile.
    pub async fn list_experiences(
        &self,
        profile_id: ProfileId,
        viewer: Option<UserId>,
    ) -> Result<Vec<Experience>, Error> {
        self.get_profile(profile_id, viewer).await?;
        Ok(self.profiles.list_experiences(profile_id).await?)
    }

    async fn validated_tag_ids(
        &self,
        kind: TagKind,
        ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, Error> {
        if ids.is_empty() {
            return Ok(ids);
        }
        let known = self.profiles.known_tag_ids(kind, &ids).await?;
        let unknown: Vec<Uuid> = ids.iter().copied().filter(|id| !known.contains(id)).collect();
        if !unknown.is_empty() {
            return Err(Error::invalid_request("unknown tag ids").with_details(
                serde_json::json!({ "unknownIds": unknown }),
            ));
        }
        Ok(ids)
    }

    async fn require_owned_image(
        &self,
        user_id: UserId,
        media_id: MediaAssetId,
    ) -> Result<(), Error> {
        let asset = self
            .media
            .find_by_id(media_id)
            .await?
            .ok_or_else(|| Error::not_found("media asset not found"))?;
        if asset.owner_user_id != user_id {
            return Err(Error::not_found("media asset not found"));
        }
        if asset.media_type != MediaType::Image {
            return Err(Error::invalid_request("media asset is not an image"));
        }
        Ok(())
    }

    async fn owned_experience(
        &self,
        user_id: UserId,
        id: ExperienceId,
    ) -> Result<Experience, Error> {
        let experience = self
            .profiles
            .find_experience(id)
            .await?
            .ok_or_else(|| Error::not_found("experience not found"))?;
        let profile = self
            .profiles
            .find_by_id(experience.profile_id)
            .await?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        if profile.owner.user_id() != Some(user_id) {
            return Err(Error::forbidden("only the profile owner may edit experiences"));
        }
        Ok(experience)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn validate_experience(input: &ExperienceInput) -> Result<(), Error> {
    if input.title.trim().is_empty() {
        return Err(Error::invalid_request("title must not be empty"));
    }
    if input.organisation.trim().is_empty() {
        return Err(Error::invalid_request("organisation must not be empty"));
    }
    if let Some(ended) = input.ended_at {
        if ended < input.started_at {
            return Err(Error::invalid_request("endedAt must not precede startedAt"));
        }
    }
    Ok(())
}
