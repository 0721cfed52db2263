//! Port abstraction for messaging persistence adapters.

use async_trait::async_trait;

use crate::domain::ids::{MessageId, ThreadId, UserId};
use crate::domain::messaging::{Message, MessageThread, ThreadParticipant};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by messaging repository adapters.
    pub enum ThreadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "thread repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "thread repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Insert a thread together with its participant rows.
    async fn insert_thread(
        &self,
        thread: &MessageThread,
        participants: &[ThreadParticipant],
    ) -> Result<(), ThreadRepositoryError>;

    async fn find_thread(
        &self,
        id: ThreadId,
    ) -> Result<Option<MessageThread>, ThreadRepositoryError>;

    /// The existing direct thread containing exactly this pair, if any.
    async fn find_direct_between(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<MessageThread>, ThreadRepositoryError>;

    /// Threads the user participates in, most recent activity first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<MessageThread>, ThreadRepositoryError>;

    async fn count_for_user(&self, user_id: UserId) -> Result<i64, ThreadRepositoryError>;

    async fn is_participant(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
    ) -> Result<bool, ThreadRepositoryError>;

    async fn participants(
        &self,
        thread_id: ThreadId,
    ) -> Result<Vec<ThreadParticipant>, ThreadRepositoryError>;

    async fn insert_message(&self, message: &Message) -> Result<(), ThreadRepositoryError>;

    /// Messages in a thread, oldest first within the page.
    async fn list_messages(
        &self,
        thread_id: ThreadId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Message>, ThreadRepositoryError>;

    async fn count_messages(&self, thread_id: ThreadId)
    -> Result<i64, ThreadRepositoryError>;

    /// Bump the thread's `last_message_at` to the given message's time.
    async fn touch_last_message(
        &self,
        thread_id: ThreadId,
        message: &Message,
    ) -> Result<(), ThreadRepositoryError>;

    /// Record the reader's high-water mark in the thread.
    async fn set_last_read(
        &self,
        thread_id: ThreadId,
        user_id: UserId,
        message_id: MessageId,
    ) -> Result<(), ThreadRepositoryError>;
}
