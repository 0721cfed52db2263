//! Diesel-backed connection-graph repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ids::{ConnectionId, UserId};
use crate::domain::networking::{Connection, ConnectionStatus};
use crate::domain::ports::{ConnectionRepository, ConnectionRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_error_with_unique, map_pool_error};
use super::models::ConnectionRow;
use super::pool::DbPool;
use super::schema::connections;

#[derive(Clone)]
pub struct DieselConnectionRepository {
    pool: DbPool,
}

impl DieselConnectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> ConnectionRepositoryError {
    map_diesel_error(
        e,
        ConnectionRepositoryError::query,
        ConnectionRepositoryError::connection,
    )
}

fn into_connections(rows: Vec<ConnectionRow>) -> Vec<Connection> {
    rows.into_iter().map(ConnectionRow::into_domain).collect()
}

#[async_trait]
impl ConnectionRepository for DieselConnectionRepository {
    async fn insert(&self, connection: &Connection) -> Result<(), ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        diesel::insert_into(connections::table)
            .values(ConnectionRow::from_domain(connection))
            .execute(&mut conn)
            .await
            .map_err(|e| {
                map_diesel_error_with_unique(
                    e,
                    ConnectionRepositoryError::query,
                    ConnectionRepositoryError::connection,
                    ConnectionRepositoryError::duplicate,
                )
            })?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ConnectionId,
    ) -> Result<Option<Connection>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let row = connections::table
            .find(id.as_uuid())
            .select(ConnectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ConnectionRow::into_domain))
    }

    async fn find_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Connection>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let (a, b) = (a.as_uuid(), b.as_uuid());
        let row = connections::table
            .filter(
                connections::requester_id
                    .eq(a)
                    .and(connections::recipient_id.eq(b))
                    .or(connections::requester_id
                        .eq(b)
                        .and(connections::recipient_id.eq(a))),
            )
            .select(ConnectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ConnectionRow::into_domain))
    }

    async fn update_status(
        &self,
        id: ConnectionId,
        status: ConnectionStatus,
        responded_at: DateTime<Utc>,
    ) -> Result<(), ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        diesel::update(connections::table.find(id.as_uuid()))
            .set((
                connections::status.eq(status.as_str()),
                connections::responded_at.eq(Some(responded_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete(&self, id: ConnectionId) -> Result<(), ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        diesel::delete(connections::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_accepted(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let id = user_id.as_uuid();
        let rows = connections::table
            .filter(connections::status.eq(ConnectionStatus::Accepted.as_str()))
            .filter(
                connections::requester_id
                    .eq(id)
                    .or(connections::recipient_id.eq(id)),
            )
            .order(connections::responded_at.desc())
            .offset(offset)
            .limit(limit)
            .select(ConnectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(into_connections(rows))
    }

    async fn count_accepted(
        &self,
        user_id: UserId,
    ) -> Result<i64, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let id = user_id.as_uuid();
        connections::table
            .filter(connections::status.eq(ConnectionStatus::Accepted.as_str()))
            .filter(
                connections::requester_id
                    .eq(id)
                    .or(connections::recipient_id.eq(id)),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_incoming_pending(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let rows = connections::table
            .filter(connections::status.eq(ConnectionStatus::Pending.as_str()))
            .filter(connections::recipient_id.eq(user_id.as_uuid()))
            .order(connections::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(ConnectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(into_connections(rows))
    }

    async fn count_incoming_pending(
        &self,
        user_id: UserId,
    ) -> Result<i64, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        connections::table
            .filter(connections::status.eq(ConnectionStatus::Pending.as_str()))
            .filter(connections::recipient_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn list_outgoing_pending(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let rows = connections::table
            .filter(connections::status.eq(ConnectionStatus::Pending.as_str()))
            .filter(connections::requester_id.eq(user_id.as_uuid()))
            .order(connections::created_at.desc())
            .offset(offset)
            .limit(limit)
            .select(ConnectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(into_connections(rows))
    }

    async fn count_outgoing_pending(
        &self,
        user_id: UserId,
    ) -> Result<i64, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        connections::table
            .filter(connections::status.eq(ConnectionStatus::Pending.as_str()))
            .filter(connections::requester_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn accepted_peer_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserId>, ConnectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ConnectionRepositoryError::connection))?;

        let id = user_id.as_uuid();
        let pairs: Vec<(Uuid, Uuid)> = connections::table
            .filter(connections::status.eq(ConnectionStatus::Accepted.as_str()))
            .filter(
                connections::requester_id
                    .eq(id)
                    .or(connections::recipient_id.eq(id)),
            )
            .select((connections::requester_id, connections::recipient_id))
            .load(&mut conn)
            .await
            .map_err(query_error)?;

        Ok(pairs
            .into_iter()
            .map(|(requester, recipient)| {
                UserId::from_uuid(if requester == id { recipient } else { requester })
            })
            .collect())
    }
}
