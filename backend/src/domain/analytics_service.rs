//! View tracking and reporting windows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use super::analytics::{AnalyticsEvent, ViewAnalytics};
use super::error::Error;
use super::ids::{PostId, ProfileId, UserId};
use super::ports::AnalyticsRepository;

const EVENT_VIEW: &str = "view";
const ENTITY_PROFILE: &str = "profile";
const ENTITY_POST: &str = "post";
const MAX_WINDOW_DAYS: i64 = 365;
const DEFAULT_WINDOW_DAYS: i64 = 30;

pub struct AnalyticsService {
    analytics: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(analytics: Arc<dyn AnalyticsRepository>) -> Self {
        Self { analytics }
    }

    /// Append an event. Tracking failures are logged, never surfaced; a
    /// dropped view must not fail the read that triggered it.
    pub async fn track(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Uuid,
        actor: Option<UserId>,
        metadata: Option<serde_json::Value>,
    ) {
        let event = AnalyticsEvent::new(event_type, entity_type, entity_id, actor, metadata);
        if let Err(err) = self.analytics.insert(&event).await {
            warn!(error = %err, event_type, "dropping analytics event");
        }
    }

    pub async fn track_profile_view(&self, profile_id: ProfileId, actor: Option<UserId>) {
        self.track(EVENT_VIEW, ENTITY_PROFILE, profile_id.into(), actor, None)
            .await;
    }

    pub async fn track_post_view(&self, post_id: PostId, actor: Option<UserId>) {
        self.track(EVENT_VIEW, ENTITY_POST, post_id.into(), actor, None)
            .await;
    }

    pub async fn profile_views(&self, profile_id: ProfileId, days: Option<i64>) -> Result<i64, Error> {
        self.views(ENTITY_PROFILE, profile_id.into(), days).await
    }

    pub async fn post_views(&self, post_id: PostId, days: Option<i64>) -> Result<i64, Error> {
        self.views(ENTITY_POST, post_id.into(), days).await
    }

    pub async fn profile_analytics(
        &self,
        profile_id: ProfileId,
        days: Option<i64>,
    ) -> Result<ViewAnalytics, Error> {
        self.view_analytics(ENTITY_PROFILE, profile_id.into(), days)
            .await
    }

    pub async fn post_analytics(
        &self,
        post_id: PostId,
        days: Option<i64>,
    ) -> Result<ViewAnalytics, Error> {
        self.view_analytics(ENTITY_POST, post_id.into(), days).await
    }

    async fn views(&self, entity_type: &str, entity_id: Uuid, days: Option<i64>) -> Result<i64, Error> {
        let since = Utc::now() - Duration::days(validated_window(days)?);
        Ok(self
            .analytics
            .count_events(EVENT_VIEW, entity_type, entity_id, since)
            .await?)
    }

    async fn view_analytics(
        &self,
        entity_type: &str,
        entity_id: Uuid,
        days: Option<i64>,
    ) -> Result<ViewAnalytics, Error> {
        let since = Utc::now() - Duration::days(validated_window(days)?);
        let views = self
            .analytics
            .count_events(EVENT_VIEW, entity_type, entity_id, since)
            .await?;
        let views_by_day = self
            .analytics
            .counts_by_day(EVENT_VIEW, entity_type, entity_id, since)
            .await?;
        Ok(ViewAnalytics {
            views,
            views_by_day,
        })
    }
}

fn validated_window(days: Option<i64>) -> Result<i64, Error> {
    let days = days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(Error::invalid_request(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(days)
}
