//! Networking graph models: connections and follows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{CompanyId, ConnectionId, FollowId, UserId};

/// Lifecycle of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
    Blocked,
}

impl ConnectionStatus {
    /// Stable textual form used by the persistence layer.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Blocked => "blocked",
        }
    }

    /// Parse the textual form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

/// A mutual-acceptance edge between two users.
///
/// Symmetric by convention: at most one row exists for a pair regardless of
/// direction, enforced by the unique constraint plus the either-direction
/// existence check in the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub requester_id: UserId,
    pub recipient_id: UserId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Connection {
    /// A fresh pending request.
    pub fn new_request(requester: UserId, recipient: UserId) -> Self {
        Self {
            id: ConnectionId::random(),
            requester_id: requester,
            recipient_id: recipient,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// Whether `user` is one of the two endpoints.
    pub fn involves(&self, user: UserId) -> bool {
        self.requester_id == user || self.recipient_id == user
    }
}

/// The entity a follow edge points at: a user or a company, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "type", content = "id")]
pub enum FollowTarget {
    User(UserId),
    Company(CompanyId),
}

/// A one-directional subscription edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: FollowId,
    pub follower_id: UserId,
    pub target: FollowTarget,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// A fresh follow edge.
    pub fn new(follower: UserId, target: FollowTarget) -> Self {
        Self {
            id: FollowId::random(),
            follower_id: follower,
            target,
            created_at: Utc::now(),
        }
    }
}

/// Aggregate counts for a user's network, computed as three independent
/// count queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowStats {
    pub followers_count: i64,
    pub following_count: i64,
    pub connections_count: i64,
}
