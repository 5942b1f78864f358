use uuid::Uuid;

use crate::modules::message::model::InsertMessage;
use crate::{api::error, modules::message::schema::MessageEntity};

#[async_trait::async_trait]
pub trait MessageRepository {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError>;

    async fn find_by_id(&self, message_id: &Uuid)
    -> Result<Option<MessageEntity>, error::SystemError>;

    /// Every message exchanged between the two users, ordered by
    /// `(created_at, id)` ascending.
    async fn find_conversation(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError>;

    async fn mark_read(&self, message_id: &Uuid)
    -> Result<Option<MessageEntity>, error::SystemError>;

    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, error::SystemError>;

    async fn count_unread(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<i64, error::SystemError>;
}
