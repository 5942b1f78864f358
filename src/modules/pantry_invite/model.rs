use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{
    friend::schema::RequestStatus,
    pantry_invite::schema::{PantryEntity, PantryInviteEntity},
    user::model::UserResponse,
};

#[derive(Debug, Clone)]
pub struct NewPantryInvite {
    pub id: Uuid,
    pub pantry_id: Uuid,
    pub invited_by_id: Uuid,
    pub invitee_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PantrySummary {
    pub id: Uuid,
    pub name: String,
}

impl From<PantryEntity> for PantrySummary {
    fn from(pantry: PantryEntity) -> Self {
        PantrySummary { id: pantry.id, name: pantry.name }
    }
}

/// A pending invite joined with its pantry and inviter profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PantryInviteRow {
    pub id: Uuid,
    pub pantry_id: Uuid,
    pub invited_by_id: Uuid,
    pub invitee_id: Uuid,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub pantry_name: String,
    pub inviter_name: String,
    pub inviter_email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryInviteResponse {
    #[serde(flatten)]
    pub invite: PantryInviteEntity,
    #[serde(rename = "dispensa")]
    pub pantry: PantrySummary,
    #[serde(rename = "convidadoPor")]
    pub invited_by: UserResponse,
}

impl From<PantryInviteRow> for PantryInviteResponse {
    fn from(row: PantryInviteRow) -> Self {
        PantryInviteResponse {
            pantry: PantrySummary { id: row.pantry_id, name: row.pantry_name },
            invited_by: UserResponse {
                id: row.invited_by_id,
                name: row.inviter_name,
                email: row.inviter_email,
            },
            invite: PantryInviteEntity {
                id: row.id,
                pantry_id: row.pantry_id,
                invited_by_id: row.invited_by_id,
                invitee_id: row.invitee_id,
                status: row.status,
                created_at: row.created_at,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendInviteBody {
    #[serde(rename = "dispensaId")]
    pub pantry_id: Uuid,
    #[serde(rename = "convidadoId")]
    pub invitee_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptedInviteResponse {
    #[serde(rename = "dispensa")]
    pub pantry: PantrySummary,
}
