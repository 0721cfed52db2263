//! Direct messaging models: threads, participants, and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{MessageId, ThreadId, UserId};

/// Kind of conversation container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    Direct,
    Group,
}

impl ThreadType {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "direct" => Some(Self::Direct),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// A conversation container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    pub id: ThreadId,
    pub thread_type: ThreadType,
    pub created_by_user_id: UserId,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MessageThread {
    /// A fresh direct thread created by `creator`.
    pub fn new_direct(creator: UserId) -> Self {
        Self {
            id: ThreadId::random(),
            thread_type: ThreadType::Direct,
            created_by_user_id: creator,
            last_message_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a user in a thread; composite key (thread, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreadParticipant {
    pub thread_id: ThreadId,
    pub user_id: UserId,
    pub last_read_message_id: Option<MessageId>,
    pub joined_at: DateTime<Utc>,
}

/// A single message, ordered within its thread by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub sender_user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A fresh message in `thread` from `sender`.
    pub fn new(thread: ThreadId, sender: UserId, content: String) -> Self {
        Self {
            id: MessageId::random(),
            thread_id: thread,
            sender_user_id: sender,
            content,
            created_at: Utc::now(),
        }
    }
}
