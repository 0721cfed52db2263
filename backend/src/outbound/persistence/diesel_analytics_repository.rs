//! Diesel-backed analytics event repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Date;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsEvent, DailyCount};
use crate::domain::ports::{AnalyticsRepository, AnalyticsRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::AnalyticsEventRow;
use super::pool::DbPool;
use super::schema::analytics_events;

#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> AnalyticsRepositoryError {
    map_diesel_error(
        e,
        AnalyticsRepositoryError::query,
        AnalyticsRepositoryError::connection,
    )
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn insert(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, AnalyticsRepositoryError::connection))?;

        diesel::insert_into(analytics_events::table)
            .values(AnalyticsEventRow::from_domain(event))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn count_events(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, AnalyticsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, AnalyticsRepositoryError::connection))?;

        analytics_events::table
            .filter(analytics_events::event_type.eq(event_type))
            .filter(analytics_events::entity_type.eq(entity_type))
            .filter(analytics_events::entity_id.eq(entity_id))
            .filter(analytics_events::occurred_at.ge(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn counts_by_day(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AnalyticsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, AnalyticsRepositoryError::connection))?;

        let rows: Vec<(NaiveDate, i64)> = analytics_events::table
            .filter(analytics_events::event_type.eq(event_type))
            .filter(analytics_events::entity_type.eq(entity_type))
            .filter(analytics_events::entity_id.eq(entity_id))
            .filter(analytics_events::occurred_at.ge(since))
            .group_by(sql::<Date>("date(occurred_at)"))
            .select((
                sql::<Date>("date(occurred_at)"),
                diesel::dsl::count(analytics_events::id),
            ))
            .order(sql::<Date>("date(occurred_at)").asc())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }
}
