//! Direct messaging: threads, messages, and read markers.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::error::Error;
use super::ids::{MessageId, ThreadId, UserId};
use super::messaging::{Message, MessageThread, ThreadParticipant};
use super::pagination::{Page, PageOf};
use super::ports::{ThreadRepository, UserRepository};

pub struct MessagingService {
    threads: Arc<dyn ThreadRepository>,
    users: Arc<dyn UserRepository>,
}

impl MessagingService {
    pub fn new(threads: Arc<dyn ThreadRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { threads, users }
    }

    /// Open a direct thread with `recipient`, or return the existing one.
    /// Idempotent from either direction of the pair.
    pub async fn create_direct_thread(
        &self,
        user: UserId,
        recipient: UserId,
    ) -> Result<MessageThread, Error> {
        if user == recipient {
            return Err(Error::invalid_request("you cannot message yourself"));
        }
        if self.users.find_by_id(recipient).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        if let Some(existing) = self.threads.find_direct_between(user, recipient).await? {
            return Ok(existing);
        }

        let thread = MessageThread::new_direct(user);
        let joined_at = Utc::now();
        let participants = [user, recipient].map(|user_id| ThreadParticipant {
            thread_id: thread.id,
            user_id,
            last_read_message_id: None,
            joined_at,
        });
        self.threads.insert_thread(&thread, &participants).await?;
        info!(thread_id = %thread.id, "opened direct thread");
        Ok(thread)
    }

    pub async fn list_threads(
        &self,
        user: UserId,
        page: Page,
    ) -> Result<PageOf<MessageThread>, Error> {
        let items = self
            .threads
            .list_for_user(user, page.offset(), page.limit())
            .await?;
        let total = self.threads.count_for_user(user).await?;
        Ok(PageOf::new(items, total, page))
    }

    pub async fn send_message(
        &self,
        user: UserId,
        thread_id: ThreadId,
        content: String,
    ) -> Result<Message, Error> {
        if content.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty"));
        }
        self.require_participant(thread_id, user).await?;

        let message = Message::new(thread_id, user, content);
        self.threads.insert_message(&message).await?;
        self.threads.touch_last_message(thread_id, &message).await?;
        Ok(message)
    }

    pub async fn list_messages(
        &self,
        user: UserId,
        thread_id: ThreadId,
        page: Page,
    ) -> Result<PageOf<Message>, Error> {
        self.require_participant(thread_id, user).await?;
        let items = self
            .threads
            .list_messages(thread_id, page.offset(), page.limit())
            .await?;
        let total = self.threads.count_messages(thread_id).await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Record the caller's read high-water mark.
    pub async fn mark_read(
        &self,
        user: UserId,
        thread_id: ThreadId,
        message_id: MessageId,
    ) -> Result<(), Error> {
        self.require_participant(thread_id, user).await?;
        self.threads
            .set_last_read(thread_id, user, message_id)
            .await?;
        Ok(())
    }

    pub async fn participants(
        &self,
        user: UserId,
        thread_id: ThreadId,
    ) -> Result<Vec<ThreadParticipant>, Error> {
        self.require_participant(thread_id, user).await?;
        Ok(self.threads.participants(thread_id).await?)
    }

    async fn require_participant(&self, thread_id: ThreadId, user: UserId) -> Result<(), Error> {
        if self
            .threads
            .find_thread(thread_id)
            .await?
            .is_none()
        {
            return Err(Error::not_found("thread not found"));
        }
        if !self.threads.is_participant(thread_id, user).await? {
            return Err(Error::forbidden("you are not part of this conversation"));
        }
        Ok(())
    }
}
