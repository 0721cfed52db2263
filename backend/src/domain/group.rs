//! Group models: communities with membership roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{GroupId, UserId};

/// Read/join access tier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupVisibility {
    Public,
    Private,
    InviteOnly,
}

impl GroupVisibility {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::InviteOnly => "invite_only",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "invite_only" => Some(Self::InviteOnly),
            _ => None,
        }
    }
}

/// Membership role within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupMemberRole {
    Owner,
    Admin,
    Moderator,
    Member,
}

impl GroupMemberRole {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Member => "member",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            "moderator" => Some(Self::Moderator),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

/// A community that posts can be associated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub visibility: GroupVisibility,
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// A fresh group owned by `owner`.
    pub fn new(
        name: String,
        slug: String,
        description: Option<String>,
        visibility: GroupVisibility,
        owner: UserId,
    ) -> Self {
        Self {
            id: GroupId::random(),
            name,
            slug,
            description,
            visibility,
            owner_user_id: owner,
            created_at: Utc::now(),
        }
    }
}

/// Derive a URL slug from a group name: lowercase, spaces to hyphens,
/// anything outside `[a-z0-9-]` dropped.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// A user's membership of a group; composite key (group, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub role: GroupMemberRole,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Rust Developers"), "rust-developers");
        assert_eq!(slugify("  Ops & SRE  "), "ops--sre");
        assert_eq!(slugify("Café Owners!"), "caf-owners");
    }
}
