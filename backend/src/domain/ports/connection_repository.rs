//! Port abstraction for connection-graph persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ids::{ConnectionId, UserId};
use crate::domain::networking::{Connection, ConnectionStatus};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by connection repository adapters.
    pub enum ConnectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "connection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "connection repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => "connection already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn insert(&self, connection: &Connection) -> Result<(), ConnectionRepositoryError>;

    async fn find_by_id(
        &self,
        id: ConnectionId,
    ) -> Result<Option<Connection>, ConnectionRepositoryError>;

    /// Any row between the pair, regardless of which side requested.
    async fn find_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Connection>, ConnectionRepositoryError>;

    async fn update_status(
        &self,
        id: ConnectionId,
        status: ConnectionStatus,
        responded_at: DateTime<Utc>,
    ) -> Result<(), ConnectionRepositoryError>;

    async fn delete(&self, id: ConnectionId) -> Result<(), ConnectionRepositoryError>;

    /// Accepted connections involving the user, newest response first.
    async fn list_accepted(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError>;

    async fn count_accepted(&self, user_id: UserId)
    -> Result<i64, ConnectionRepositoryError>;

    /// Pending requests where the user is the recipient, newest first.
    async fn list_incoming_pending(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError>;

    async fn count_incoming_pending(
        &self,
        user_id: UserId,
    ) -> Result<i64, ConnectionRepositoryError>;

    /// Pending requests the user sent, newest first.
    async fn list_outgoing_pending(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Connection>, ConnectionRepositoryError>;

    async fn count_outgoing_pending(
        &self,
        user_id: UserId,
    ) -> Result<i64, ConnectionRepositoryError>;

    /// User ids connected to `user_id` via accepted rows.
    async fn accepted_peer_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserId>, ConnectionRepositoryError>;
}
