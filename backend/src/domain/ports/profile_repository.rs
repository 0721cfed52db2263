//! Port abstraction for profile persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ids::{CompanyId, ExperienceId, ProfileId, UserId};
use crate::domain::profile::{Experience, Profile, Tag, TagKind};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "profile already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;

    async fn find_by_id(&self, id: ProfileId)
    -> Result<Option<Profile>, ProfileRepositoryError>;

    async fn find_by_user(&self, user_id: UserId)
    -> Result<Option<Profile>, ProfileRepositoryError>;

    async fn find_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Persist the mutable fields of `profile` (headline, about, visibility,
    /// media references, tag sets).
    async fn update(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;

    /// Subset of `ids` that exist in the `kind` catalogue. Used to reject
    /// dangling tag references before a profile update.
    async fn known_tag_ids(
        &self,
        kind: TagKind,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, ProfileRepositoryError>;

    /// Catalogue rows for the given ids, in no particular order.
    async fn tags_by_ids(
        &self,
        kind: TagKind,
        ids: &[Uuid],
    ) -> Result<Vec<Tag>, ProfileRepositoryError>;

    async fn insert_experience(
        &self,
        experience: &Experience,
    ) -> Result<(), ProfileRepositoryError>;

    async fn find_experience(
        &self,
        id: ExperienceId,
    ) -> Result<Option<Experience>, ProfileRepositoryError>;

    async fn update_experience(
        &self,
        experience: &Experience,
    ) -> Result<(), ProfileRepositoryError>;

    async fn delete_experience(&self, id: ExperienceId) -> Result<(), ProfileRepositoryError>;

    /// Experiences for a profile ordered by `sort_order`, then start date
    /// descending.
    async fn list_experiences(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<Experience>, ProfileRepositoryError>;
}
