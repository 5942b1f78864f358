/// Message Service
///
/// Appends direct messages between friends and serves the ordered
/// conversation between two users, plus read-state bookkeeping.
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::constants::MAX_MESSAGE_LENGTH;
use crate::modules::friend::repository::FriendRepository;
use crate::modules::message::model::InsertMessage;
use crate::modules::message::repository::MessageRepository;
use crate::modules::message::schema::MessageEntity;

#[derive(Clone)]
pub struct MessageService<M, F>
where
    M: MessageRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
{
    message_repo: Arc<M>,
    friend_repo: Arc<F>,
}

impl<M, F> MessageService<M, F>
where
    M: MessageRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
{
    pub fn with_dependencies(message_repo: Arc<M>, friend_repo: Arc<F>) -> Self {
        MessageService { message_repo, friend_repo }
    }

    /// Only friends may message each other. Content is stored as sent.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
    ) -> Result<MessageEntity, error::SystemError> {
        if content.trim().is_empty() {
            return Err(error::SystemError::invalid_argument("Message content cannot be empty"));
        }

        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(error::SystemError::invalid_argument(format!(
                "Message content cannot exceed {MAX_MESSAGE_LENGTH} characters"
            )));
        }

        if sender_id == receiver_id {
            return Err(error::SystemError::invalid_argument("Cannot send a message to yourself"));
        }

        if self.friend_repo.find_friendship(&sender_id, &receiver_id).await?.is_none() {
            return Err(error::SystemError::forbidden("You can only message your friends"));
        }

        let message = self
            .message_repo
            .create(&InsertMessage { id: Uuid::now_v7(), sender_id, receiver_id, content })
            .await?;

        tracing::info!("Message {} appended from {} to {}", message.id, sender_id, receiver_id);

        Ok(message)
    }

    pub async fn get_conversation(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        self.message_repo.find_conversation(&user_id, &friend_id).await
    }

    /// Idempotent; only the receiver may flip the read flag.
    pub async fn mark_read(
        &self,
        message_id: Uuid,
        user_id: Uuid,
    ) -> Result<MessageEntity, error::SystemError> {
        let message = self
            .message_repo
            .find_by_id(&message_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))?;

        if message.receiver_id != user_id {
            return Err(error::SystemError::forbidden(
                "Only the receiver can mark this message as read",
            ));
        }

        if message.read {
            return Ok(message);
        }

        self.message_repo
            .mark_read(&message_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Message not found"))
    }

    pub async fn mark_conversation_read(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<u64, error::SystemError> {
        let updated = self.message_repo.mark_conversation_read(&user_id, &friend_id).await?;
        tracing::debug!("{} messages from {} marked read by {}", updated, friend_id, user_id);
        Ok(updated)
    }

    pub async fn unread_count(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<i64, error::SystemError> {
        self.message_repo.count_unread(&user_id, &friend_id).await
    }
}
