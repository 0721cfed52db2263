//! Post model and its lifecycle enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CompanyId, GroupId, PostId, UserId};

/// Content category of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Post,
    Blog,
}

impl PostKind {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Blog => "blog",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "post" => Some(Self::Post),
            "blog" => Some(Self::Blog),
            _ => None,
        }
    }
}

/// Publication lifecycle state.
///
/// Implicit lifecycle: draft → (published | scheduled) → archived, with
/// published reachable directly from creation. Transitions are plain field
/// mutations; nothing prevents re-publishing an archived post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Archived,
}

impl PostStatus {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "scheduled" => Some(Self::Scheduled),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Format of the post body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    Plain,
    Markdown,
    Rich,
}

impl ContentFormat {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Markdown => "markdown",
            Self::Rich => "rich",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plain" => Some(Self::Plain),
            "markdown" => Some(Self::Markdown),
            "rich" => Some(Self::Rich),
            _ => None,
        }
    }
}

/// Read-access tier on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostVisibility {
    Public,
    LoggedIn,
    Connections,
}

impl PostVisibility {
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

/// Moderation gate, independent of visibility. Removed content is hidden
/// from non-owners regardless of its visibility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Flagged,
    Removed,
}

impl ModerationStatus {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Flagged => "flagged",
            Self::Removed => "removed",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "flagged" => Some(Self::Flagged),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

/// The authoring entity of a post: a user or a company, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "type", content = "id")]
pub enum PostAuthor {
    User(UserId),
    Company(CompanyId),
}

impl PostAuthor {
    /// The authoring user id, when the post was written by a user.
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Company(_) => None,
        }
    }

    /// The authoring company id, when the post was written by a company.
    pub const fn company_id(&self) -> Option<CompanyId> {
        match self {
            Self::Company(id) => Some(*id),
            Self::User(_) => None,
        }
    }
}

/// A feed post or blog entry.
///
/// `repost_of_post_id` is a by-id reference resolved via lookup, never an
/// embedded owning pointer, since repost chains may form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: PostAuthor,
    pub group_id: Option<GroupId>,
    pub kind: PostKind,
    pub status: PostStatus,
    pub content_format: ContentFormat,
    pub content: Option<String>,
    pub content_markdown: Option<String>,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub link_description: Option<String>,
    pub link_image_url: Option<String>,
    pub visibility: PostVisibility,
    pub repost_of_post_id: Option<PostId>,
    pub moderation_status: ModerationStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
