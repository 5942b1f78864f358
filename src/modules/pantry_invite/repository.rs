use uuid::Uuid;

use crate::api::error;
use crate::modules::pantry_invite::model::{NewPantryInvite, PantryInviteRow};
use crate::modules::pantry_invite::schema::{PantryEntity, PantryInviteEntity};

#[async_trait::async_trait]
pub trait PantryRepository {
    async fn find_pantry_by_id(
        &self,
        pantry_id: &Uuid,
    ) -> Result<Option<PantryEntity>, error::SystemError>;

    /// Whether `user_id` has a membership row. Owners are checked separately.
    async fn is_member(&self, pantry_id: &Uuid, user_id: &Uuid) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait PantryInviteRepository {
    async fn find_invite_by_id(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError>;

    async fn find_pending_invite(
        &self,
        pantry_id: &Uuid,
        invitee_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError>;

    /// Pending invites addressed to `user_id`, newest first.
    async fn find_pending_invites_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<PantryInviteRow>, error::SystemError>;

    async fn create_invite(
        &self,
        invite: &NewPantryInvite,
    ) -> Result<PantryInviteEntity, error::SystemError>;
}

#[async_trait::async_trait]
pub trait PantryInviteRepo: PantryRepository + PantryInviteRepository + Send + Sync {
    /// Moves a pending invite to `accepted` and inserts the invitee into the
    /// pantry members in one transaction. `None` when it was not pending.
    async fn accept_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError>;

    /// `None` when the invite was not pending anymore.
    async fn reject_invite_atomic(
        &self,
        invite_id: &Uuid,
    ) -> Result<Option<PantryInviteEntity>, error::SystemError>;
}
