//! Diesel-backed profile repository, covering profiles, the tag catalogues
//! and experience entries.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ids::{CompanyId, ExperienceId, ProfileId, UserId};
use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::profile::{Experience, Profile, Tag, TagKind};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::{ExperienceRow, ProfileRow};
use super::pool::DbPool;
use super::schema::{industry_niches, profile_experiences, profiles, services, skills};

#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error(
        e,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

fn into_profile(row: ProfileRow) -> Result<Profile, ProfileRepositoryError> {
    row.into_domain().map_err(ProfileRepositoryError::query)
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn insert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        diesel::insert_into(profiles::table)
            .values(ProfileRow::from_domain(profile))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error_with_unique(
                    e,
                    ProfileRepositoryError::query,
                    ProfileRepositoryError::connection,
                    ProfileRepositoryError::duplicate,
                )
            })?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ProfileId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let row = profiles::table
            .find(id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(into_profile).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let row = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(into_profile).transpose()
    }

    async fn find_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let row = profiles::table
            .filter(profiles::company_id.eq(company_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        row.map(into_profile).transpose()
    }

    async fn update(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        diesel::update(profiles::table.find(profile.id.as_uuid()))
            .set((
                profiles::headline.eq(&profile.headline),
                profiles::about.eq(&profile.about),
                profiles::location.eq(&profile.location),
                profiles::website_url.eq(&profile.website_url),
                profiles::visibility.eq(profile.visibility.as_str()),
                profiles::avatar_media_id.eq(profile.avatar_media_id.map(Uuid::from)),
                profiles::banner_media_id.eq(profile.banner_media_id.map(Uuid::from)),
                profiles::skill_ids.eq(&profile.skill_ids),
                profiles::service_ids.eq(&profile.service_ids),
                profiles::niche_ids.eq(&profile.niche_ids),
                profiles::updated_at.eq(profile.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn known_tag_ids(
        &self,
        kind: TagKind,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, ProfileRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let found = match kind {
            TagKind::Skill => {
                skills::table
                    .filter(skills::id.eq_any(ids))
                    .select(skills::id)
                    .load(&mut conn)
                    .await
            }
            TagKind::Service => {
                services::table
                    .filter(services::id.eq_any(ids))
                    .select(services::id)
                    .load(&mut conn)
                    .await
            }
            TagKind::Niche => {
                industry_niches::table
                    .filter(industry_niches::id.eq_any(ids))
                    .select(industry_niches::id)
                    .load(&mut conn)
                    .await
            }
        };
        found.map_err(query_error)
    }

    async fn tags_by_ids(
        &self,
        kind: TagKind,
        ids: &[Uuid],
    ) -> Result<Vec<Tag>, ProfileRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let rows: Vec<(Uuid, String)> = match kind {
            TagKind::Skill => {
                skills::table
                    .filter(skills::id.eq_any(ids))
                    .select((skills::id, skills::name))
                    .load(&mut conn)
                    .await
            }
            TagKind::Service => {
                services::table
                    .filter(services::id.eq_any(ids))
                    .select((services::id, services::name))
                    .load(&mut conn)
                    .await
            }
            TagKind::Niche => {
                industry_niches::table
                    .filter(industry_niches::id.eq_any(ids))
                    .select((industry_niches::id, industry_niches::name))
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(query_error)?;

        Ok(rows.into_iter().map(|(id, name)| Tag { id, name }).collect())
    }

    async fn insert_experience(
        &self,
        experience: &Experience,
    ) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        diesel::insert_into(profile_experiences::table)
            .values(ExperienceRow::from_domain(experience))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn find_experience(
        &self,
        id: ExperienceId,
    ) -> Result<Option<Experience>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let row = profile_experiences::table
            .find(id.as_uuid())
            .select(ExperienceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ExperienceRow::into_domain))
    }

    async fn update_experience(
        &self,
        experience: &Experience,
    ) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        diesel::update(profile_experiences::table.find(experience.id.as_uuid()))
            .set((
                profile_experiences::title.eq(&experience.title),
                profile_experiences::organisation.eq(&experience.organisation),
                profile_experiences::description.eq(&experience.description),
                profile_experiences::started_at.eq(experience.started_at),
                profile_experiences::ended_at.eq(experience.ended_at),
                profile_experiences::sort_order.eq(experience.sort_order),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete_experience(&self, id: ExperienceId) -> Result<(), ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        diesel::delete(profile_experiences::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_experiences(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Experience>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ProfileRepositoryError::connection))?;

        let rows = profile_experiences::table
            .filter(profile_experiences::profile_id.eq(profile_id.as_uuid()))
            .order((
                profile_experiences::sort_order.asc(),
                profile_experiences::started_at.desc(),
            ))
            .select(ExperienceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(ExperienceRow::into_domain).collect())
    }
}
