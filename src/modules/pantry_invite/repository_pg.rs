use uuid::Uuid;

use crate::{
    api::error,
    modules::pantry_invite::{
        model::{NewPantryInvite, PantryInviteRow},
        repository::{PantryInviteRepo, PantryInviteRepository, PantryRepository},
        schema::{PantryEntity, PantryInviteEntity},
    },
};

#[derive(Clone)]
pub struct PantryInviteRepositoryPg {
    pool: sqlx::PgPool,
}

impl PantryInviteRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PantryRepository for PantryInviteRepositoryPg {
    async fn find_pantry_by_id(
        &self,
        pantry_id: &Uuid,
    ) -> Result<Option<PantryEntity>, error::SystemError> {
        let pantry = sqlx::query_as::<_, PantryEntity>(
            "SELECT id, name, owner_id FROM pantries WHERE id = $1",
        )
        .bind(pantry_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pantry)
    }

    async fn is_member(
        &self,
        pantry_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let is_member: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pantry_members WHERE pantry_id = $1 AND user_id = $2)",
        )
        .bind(pantry_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(is_member)
    }
}

#[async_trait::async_trait]
impl PantryInviteRepository for PantryInviteRepositoryPg {
    async fn find_invite_by_id(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        let invite = sqlx::query_as::<_, PantryInviteEntity>(
            r#"
            SELECT id, pantry_id, invited_by_id, invitee_id, status, created_at
            FROM pantry_invites
            WHERE id = $1
            "#,
        )
        .bind(invite_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    async fn find_pending_invite(
        &self,
        pantry_id: &Uuid,
        invitee_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        let invite = sqlx::query_as::<_, PantryInviteEntity>(
            r#"
            SELECT id, pantry_id, invited_by_id, invitee_id, status, created_at
            FROM pantry_invites
            WHERE pantry_id = $1 AND invitee_id = $2 AND status = 'pending'
            "#,
        )
        .bind(pantry_id)
        .bind(invitee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invite)
    }

    async fn find_pending_invites_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PantryInviteRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, PantryInviteRow>(
            r#"
            SELECT
                pi.id,
                pi.pantry_id,
                pi.invited_by_id,
                pi.invitee_id,
                pi.status,
                pi.created_at,
                p.name AS pantry_name,
                u.name AS inviter_name,
                u.email AS inviter_email
            FROM pantry_invites pi
            JOIN pantries p ON p.id = pi.pantry_id
            JOIN users u ON u.id = pi.invited_by_id
            WHERE pi.invitee_id = $1
              AND pi.status = 'pending'
            ORDER BY pi.created_at DESC, pi.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_invite(
        &self,
        invite: &NewPantryInvite,
    ) -> Result<PantryInviteEntity, error::SystemError> {
        // pantry_invites_pending_key rejects a second pending invite
        let created = sqlx::query_as::<_, PantryInviteEntity>(
            r#"
            INSERT INTO pantry_invites (id, pantry_id, invited_by_id, invitee_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, pantry_id, invited_by_id, invitee_id, status, created_at
            "#,
        )
        .bind(invite.id)
        .bind(invite.pantry_id)
        .bind(invite.invited_by_id)
        .bind(invite.invitee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}

#[async_trait::async_trait]
impl PantryInviteRepo for PantryInviteRepositoryPg {
    async fn accept_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let accepted = sqlx::query_as::<_, PantryInviteEntity>(
            r#"
            UPDATE pantry_invites
            SET status = 'accepted'
            WHERE id = $1
              AND status = 'pending'
            RETURNING id, pantry_id, invited_by_id, invitee_id, status, created_at
            "#,
        )
        .bind(invite_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invite) = accepted else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO pantry_members (pantry_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(invite.pantry_id)
        .bind(invite.invitee_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(invite))
    }

    async fn reject_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError> {
        let rejected = sqlx::query_as::<_, PantryInviteEntity>(
            r#"
            UPDATE pantry_invites
            SET status = 'rejected'
            WHERE id = $1
              AND status = 'pending'
            RETURNING id, pantry_id, invited_by_id, invitee_id, status, created_at
            "#,
        )
        .bind(invite_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rejected)
    }
}
