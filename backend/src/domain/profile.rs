//! Profile model: the public face of a user or company.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ids::{CompanyId, ExperienceId, MediaAssetId, ProfileId, UserId};

/// Read-access tier on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVisibility {
    Public,
    LoggedIn,
    Connections,
}

impl ProfileVisibility {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::LoggedIn => "logged_in",
            Self::Connections => "connections",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "logged_in" => Some(Self::LoggedIn),
            "connections" => Some(Self::Connections),
            _ => None,
        }
    }
}

/// The entity a profile belongs to: a user or a company, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "type", content = "id")]
pub enum ProfileOwner {
    User(UserId),
    Company(CompanyId),
}

impl ProfileOwner {
    /// The owning user id, when the profile belongs to a user.
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Company(_) => None,
        }
    }
}

/// Tag catalogue a profile can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Skill,
    Service,
    Niche,
}

/// Professional profile for a user or company.
///
/// Skill/service/niche sets reference catalogue rows by id and are only ever
/// replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub owner: ProfileOwner,
    pub headline: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub visibility: ProfileVisibility,
    pub avatar_media_id: Option<MediaAssetId>,
    pub banner_media_id: Option<MediaAssetId>,
    pub skill_ids: Vec<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub niche_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh public profile for a user, created lazily on first access.
    pub fn new_for_user(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::random(),
            owner: ProfileOwner::User(user_id),
            headline: None,
            about: None,
            location: None,
            website_url: None,
            visibility: ProfileVisibility::Public,
            avatar_media_id: None,
            banner_media_id: None,
            skill_ids: Vec::new(),
            service_ids: Vec::new(),
            niche_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A work-history entry attached to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: ExperienceId,
    pub profile_id: ProfileId,
    pub title: String,
    pub organisation: String,
    pub description: Option<String>,
    pub started_at: NaiveDate,
    pub ended_at: Option<NaiveDate>,
    pub sort_order: i32,
}

/// A catalogue tag (skill, service, or industry niche).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}
