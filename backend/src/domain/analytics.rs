//! Analytics event model: append-only view/engagement tracking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ids::UserId;

/// An append-only analytics record; never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub actor_user_id: Option<UserId>,
    pub metadata: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// A fresh event occurring now.
    pub fn new(
        event_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        actor: Option<UserId>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            actor_user_id: actor,
            metadata: metadata.unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            occurred_at: Utc::now(),
        }
    }
}

/// Daily view count bucket in a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// View totals plus per-day breakdown for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewAnalytics {
    pub views: i64,
    pub views_by_day: Vec<DailyCount>,
}
