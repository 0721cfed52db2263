//! Port abstraction for analytics persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsEvent, DailyCount};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by analytics repository adapters.
    pub enum AnalyticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "analytics repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "analytics repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Append an event. Events are immutable once written.
    async fn insert(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsRepositoryError>;

    /// Total events of a type against an entity since `since`.
    async fn count_events(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AnalyticsRepositoryError>;

    /// Per-day event counts since `since`, ascending by date. Days with no
    /// events are absent.
    async fn counts_by_day(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AnalyticsRepositoryError>;
}
