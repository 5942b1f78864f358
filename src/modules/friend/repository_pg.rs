use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestRow, NewFriendRequest},
            repository::{FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{FriendRequestEntity, RequestStatus},
        },
        user::model::UserResponse,
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at
            FROM friend_requests
            WHERE status = 'accepted'
              AND LEAST(sender_id, receiver_id) = LEAST($1::uuid, $2::uuid)
              AND GREATEST(sender_id, receiver_id) = GREATEST($1::uuid, $2::uuid)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, UserResponse>(
            r#"
        SELECT DISTINCT
            u.id,
            u.name,
            u.email
        FROM friend_requests fr
        JOIN users u
            ON u.id = CASE
                WHEN fr.sender_id = $1 THEN fr.receiver_id
                ELSE fr.sender_id
            END
        WHERE fr.status = 'accepted'
          AND (fr.sender_id = $1 OR fr.receiver_id = $1)
        ORDER BY u.name, u.id
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn find_pending_friend_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at
            FROM friend_requests
            WHERE status = 'pending'
              AND ((sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1))
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at
            FROM friend_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_friend_request_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestRow>(
            r#"
            SELECT
                fr.id,
                fr.sender_id,
                fr.receiver_id,
                fr.status,
                fr.created_at,
                u.id AS user_id,
                u.name AS user_name,
                u.email AS user_email
            FROM friend_requests fr
            JOIN users u
                ON fr.receiver_id = u.id
            WHERE fr.sender_id = $1
              AND fr.status = 'pending'
            ORDER BY fr.created_at DESC, fr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_friend_request_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendRequestRow>(
            r#"
            SELECT
                fr.id,
                fr.sender_id,
                fr.receiver_id,
                fr.status,
                fr.created_at,
                u.id AS user_id,
                u.name AS user_name,
                u.email AS user_email
            FROM friend_requests fr
            JOIN users u
                ON fr.sender_id = u.id
            WHERE fr.receiver_id = $1
              AND fr.status = 'pending'
            ORDER BY fr.created_at DESC, fr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_friend_request(
        &self,
        request: &NewFriendRequest,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        // friend_requests_pending_pair_key rejects a second pending row for the pair
        let created = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, sender_id, receiver_id)
            SELECT $1::uuid, $2::uuid, $3::uuid
            WHERE NOT EXISTS (
                SELECT 1
                FROM friend_requests
                WHERE status = 'accepted'
                  AND LEAST(sender_id, receiver_id) = LEAST($2::uuid, $3::uuid)
                  AND GREATEST(sender_id, receiver_id) = GREATEST($2::uuid, $3::uuid)
            )
            RETURNING id, sender_id, receiver_id, status, created_at
            "#,
        )
        .bind(request.id)
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(created)
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryPg {
    async fn decide_friend_request_atomic(
        &self,
        request_id: &Uuid,
        decision: RequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let decided = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = $2
            WHERE id = $1
              AND status = 'pending'
            RETURNING id, sender_id, receiver_id, status, created_at
            "#,
        )
        .bind(request_id)
        .bind(decision)
        .fetch_optional(&self.pool)
        .await?;

        Ok(decided)
    }
}
