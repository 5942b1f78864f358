use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        pantry_invite::{
            model::{NewPantryInvite, PantryInviteResponse, PantrySummary},
            repository::PantryInviteRepo,
            schema::PantryInviteEntity,
        },
        user::{model::UserResponse, repository::UserRepository},
    },
};

#[derive(Clone)]
pub struct PantryInviteService<R, U>
where
    R: PantryInviteRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    invite_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> PantryInviteService<R, U>
where
    R: PantryInviteRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(invite_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        PantryInviteService { invite_repo, user_repo }
    }

    pub async fn send_invite(
        &self,
        inviter_id: Uuid,
        pantry_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<PantryInviteResponse, error::SystemError> {
        if inviter_id == invitee_id {
            return Err(error::SystemError::invalid_argument("Cannot invite yourself"));
        }

        let (pantry, inviter, invitee) = tokio::try_join!(
            self.invite_repo.find_pantry_by_id(&pantry_id),
            self.user_repo.find_by_id(&inviter_id),
            self.user_repo.find_by_id(&invitee_id),
        )?;

        let pantry = pantry.ok_or_else(|| error::SystemError::not_found("Pantry not found"))?;
        let inviter = inviter.ok_or_else(|| error::SystemError::not_found("User not found"))?;
        if invitee.is_none() {
            return Err(error::SystemError::not_found("Invited user not found"));
        }

        let (inviter_is_member, invitee_is_member) = tokio::try_join!(
            self.invite_repo.is_member(&pantry_id, &inviter_id),
            self.invite_repo.is_member(&pantry_id, &invitee_id),
        )?;

        // the owner has no membership row
        let inviter_is_member = inviter_is_member || pantry.owner_id == inviter_id;
        let invitee_is_member = invitee_is_member || pantry.owner_id == invitee_id;

        if !inviter_is_member {
            return Err(error::SystemError::forbidden("Only pantry members can send invites"));
        }

        if invitee_is_member {
            return Err(error::SystemError::conflict("User is already a member of this pantry"));
        }

        if self.invite_repo.find_pending_invite(&pantry_id, &invitee_id).await?.is_some() {
            return Err(error::SystemError::conflict("A pending invite already exists"));
        }

        let invite = self
            .invite_repo
            .create_invite(&NewPantryInvite {
                id: Uuid::now_v7(),
                pantry_id,
                invited_by_id: inviter_id,
                invitee_id,
            })
            .await?;

        tracing::info!(
            "Pantry invite {} sent to {} for pantry {}",
            invite.id,
            invitee_id,
            pantry_id
        );

        Ok(PantryInviteResponse {
            invite,
            pantry: PantrySummary::from(pantry),
            invited_by: UserResponse::from(inviter),
        })
    }

    pub async fn get_pending_invites(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PantryInviteResponse>, error::SystemError> {
        let rows = self.invite_repo.find_pending_invites_to_user(&user_id).await?;
        Ok(rows.into_iter().map(PantryInviteResponse::from).collect())
    }

    /// Accepts the invite and returns the pantry the user joined.
    pub async fn accept_invite(
        &self,
        user_id: Uuid,
        invite_id: Uuid,
    ) -> Result<PantrySummary, error::SystemError> {
        self.check_decidable(user_id, invite_id).await?;

        let invite = self
            .invite_repo
            .accept_invite_atomic(&invite_id)
            .await?
            .ok_or_else(|| error::SystemError::conflict("Invite was already decided"))?;

        tracing::info!("Pantry invite {} accepted by {}", invite_id, user_id);

        let pantry = self
            .invite_repo
            .find_pantry_by_id(&invite.pantry_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Pantry not found"))?;

        Ok(PantrySummary::from(pantry))
    }

    pub async fn reject_invite(
        &self,
        user_id: Uuid,
        invite_id: Uuid,
    ) -> Result<PantryInviteEntity, error::SystemError> {
        self.check_decidable(user_id, invite_id).await?;

        let invite = self
            .invite_repo
            .reject_invite_atomic(&invite_id)
            .await?
            .ok_or_else(|| error::SystemError::conflict("Invite was already decided"))?;

        tracing::info!("Pantry invite {} rejected by {}", invite_id, user_id);

        Ok(invite)
    }

    async fn check_decidable(
        &self,
        user_id: Uuid,
        invite_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let invite = self
            .invite_repo
            .find_invite_by_id(&invite_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Invite not found"))?;

        if invite.invitee_id != user_id {
            return Err(error::SystemError::forbidden("You can only decide on your own invites"));
        }

        if !invite.status.is_pending() {
            return Err(error::SystemError::conflict(format!(
                "Invite was already {}",
                invite.status.as_str()
            )));
        }

        Ok(())
    }
}
