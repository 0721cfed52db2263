//! Company pages and their membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CompanyId, UserId};

/// A company page that can author posts and be followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Construct a new company owned by the creating user.
    pub fn new(name: String, slug: String, description: Option<String>, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: CompanyId::random(),
            name,
            slug,
            description,
            owner_user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Membership role within a company page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompanyMemberRole {
    Owner,
    Admin,
    Member,
}

impl CompanyMemberRole {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Whether this role may edit the company page.
    pub fn can_manage(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

/// A user's membership of a company page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMember {
    pub company_id: CompanyId,
    pub user_id: UserId,
    pub role: CompanyMemberRole,
    pub joined_at: DateTime<Utc>,
}
