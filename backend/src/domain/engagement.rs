//! Engagement models: reactions and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CommentId, PostId, ReactionId, ReactionTypeId, UserId};

/// Catalogue entry describing a reaction kind (like, celebrate, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactionType {
    pub id: ReactionTypeId,
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A user's reaction to a post or comment. At most one row exists per
/// (user, target) pair; changing the reaction overwrites the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: ReactionId,
    pub user_id: UserId,
    pub reaction_type_id: ReactionTypeId,
    pub target_post_id: Option<PostId>,
    pub target_comment_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// A fresh reaction to a post.
    pub fn new_for_post(user: UserId, post: PostId, reaction_type: ReactionTypeId) -> Self {
        Self {
            id: ReactionId::random(),
            user_id: user,
            reaction_type_id: reaction_type,
            target_post_id: Some(post),
            target_comment_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Per-type reaction tally for a post, computed by read-time aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTally {
    pub reaction_type: ReactionType,
    pub count: i64,
}

/// A comment on a post. Comments nest one level via `parent_comment_id`,
/// resolved by id lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_user_id: UserId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// A fresh comment by `author` on `post`.
    pub fn new(
        post: PostId,
        author: UserId,
        content: String,
        parent: Option<CommentId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::random(),
            post_id: post,
            author_user_id: author,
            parent_comment_id: parent,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
