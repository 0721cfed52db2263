//! Diesel-backed messaging repository for threads, participants and messages.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ids::{MessageId, ThreadId, UserId};
use crate::domain::messaging::{Message, MessageThread, ThreadParticipant, ThreadType};
use crate::domain::ports::{ThreadRepository, ThreadRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, ParticipantRow, ThreadRow};
use super::pool::DbPool;
use super::schema::{message_threads, messages, thread_participants};

#[derive(Clone)]
pub struct DieselThreadRepository {
    pool: DbPool,
}

impl DieselThreadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(e: diesel::result::Error) -> ThreadRepositoryError {
    map_diesel_error(
        e,
        ThreadRepositoryError::query,
        ThreadRepositoryError::connection,
    )
}

#[async_trait]
impl ThreadRepository for DieselThreadRepository {
    async fn insert_thread(
        &self,
        thread: &MessageThread,
        participants: &[ThreadParticipant],
    ) -> Result<(), ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let thread_row = ThreadRow::from_domain(thread);
        let participant_rows: Vec<ParticipantRow> =
            participants.iter().map(ParticipantRow::from_domain).collect();
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(message_threads::table)
                    .values(thread_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(thread_participants::table)
                    .values(participant_rows)
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn find_thread(
        &self,
        id: ThreadId,
    ) -> Result<Option<MessageThread>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let row = message_threads::table
            .find(id.as_uuid())
            .select(ThreadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ThreadRow::into_domain))
    }

    async fn find_direct_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<MessageThread>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let threads_of_a = thread_participants::table
            .filter(thread_participants::user_id.eq(a.as_uuid()))
            .select(thread_participants::thread_id);
        let threads_of_b = thread_participants::table
            .filter(thread_participants::user_id.eq(b.as_uuid()))
            .select(thread_participants::thread_id);

        let row = message_threads::table
            .filter(message_threads::thread_type.eq(ThreadType::Direct.as_str()))
            .filter(message_threads::id.eq_any(threads_of_a))
            .filter(message_threads::id.eq_any(threads_of_b))
            .select(ThreadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?;
        Ok(row.map(ThreadRow::into_domain))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MessageThread>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let rows = message_threads::table
            .inner_join(thread_participants::table)
            .filter(thread_participants::user_id.eq(user_id.as_uuid()))
            .order((
                message_threads::last_message_at.desc().nulls_last(),
                message_threads::created_at.desc(),
            ))
            .offset(offset)
            .limit(limit)
            .select(ThreadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(ThreadRow::into_domain).collect())
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<i64, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        thread_participants::table
            .filter(thread_participants::user_id.eq(user_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn is_participant(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
    ) -> Result<bool, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        diesel::select(diesel::dsl::exists(
            thread_participants::table.find((thread_id.as_uuid(), user_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(query_error)
    }

    async fn participants(
        &self,
        thread_id: ThreadId,
    ) -> Result<Vec<ThreadParticipant>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let rows = thread_participants::table
            .filter(thread_participants::thread_id.eq(thread_id.as_uuid()))
            .order(thread_participants::joined_at.asc())
            .select(ParticipantRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(ParticipantRow::into_domain).collect())
    }

    async fn insert_message(&self, message: &Message) -> Result<(), ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        diesel::insert_into(messages::table)
            .values(MessageRow::from_domain(message))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn list_messages(
        &self,
        thread_id: ThreadId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Message>, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        let rows = messages::table
            .filter(messages::thread_id.eq(thread_id.as_uuid()))
            .order(messages::created_at.asc())
            .offset(offset)
            .limit(limit)
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(rows.into_iter().map(MessageRow::into_domain).collect())
    }

    async fn count_messages(&self, thread_id: ThreadId) -> Result<i64, ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        messages::table
            .filter(messages::thread_id.eq(thread_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn touch_last_message(
        &self,
        thread_id: ThreadId,
        message: &Message,
    ) -> Result<(), ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        diesel::update(message_threads::table.find(thread_id.as_uuid()))
            .set(message_threads::last_message_at.eq(Some(message.created_at)))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn set_last_read(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
        message_id: MessageId,
    ) -> Result<(), ThreadRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, ThreadRepositoryError::connection))?;

        diesel::update(
            thread_participants::table.find((thread_id.as_uuid(), user_id.as_uuid())),
        )
        .set(thread_participants::last_read_message_id.eq(Some(message_id.as_uuid())))
        .execute(&mut conn)
        .await
        .map_err(query_error)?;
        Ok(())
    }
}
