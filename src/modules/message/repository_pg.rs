use uuid::Uuid;

use crate::{
    api::error,
    modules::message::{model::InsertMessage, repository::MessageRepository, schema::MessageEntity},
};

#[derive(Clone)]
pub struct MessageRepositoryPg {
    pool: sqlx::PgPool,
}

impl MessageRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageRepository for MessageRepositoryPg {
    async fn create(&self, message: &InsertMessage) -> Result<MessageEntity, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sender_id, receiver_id, content, read, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_by_id(
        &self,
        message_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, sender_id, receiver_id, content, read, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn find_conversation(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Vec<MessageEntity>, error::SystemError> {
        // has index on (LEAST, GREATEST, created_at, id)
        let messages = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT id, sender_id, receiver_id, content, read, created_at
            FROM messages
            WHERE LEAST(sender_id, receiver_id) = LEAST($1::uuid, $2::uuid)
              AND GREATEST(sender_id, receiver_id) = GREATEST($1::uuid, $2::uuid)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn mark_read(
        &self,
        message_id: &Uuid,
    ) -> Result<Option<MessageEntity>, error::SystemError> {
        let message = sqlx::query_as::<_, MessageEntity>(
            r#"
            UPDATE messages
            SET read = TRUE
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, content, read, created_at
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn mark_conversation_read(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<u64, error::SystemError> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND read = FALSE
            "#,
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_unread(
        &self,
        receiver_id: &Uuid,
        sender_id: &Uuid,
    ) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE receiver_id = $1 AND sender_id = $2 AND read = FALSE
            "#,
        )
        .bind(receiver_id)
        .bind(sender_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
