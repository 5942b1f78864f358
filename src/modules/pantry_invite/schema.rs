use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::friend::schema::RequestStatus;

#[derive(Debug, Clone, FromRow)]
pub struct PantryEntity {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

/// Invitation into a shared pantry ("dispensa"). Field names on the wire
/// follow the pantry domain vocabulary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PantryInviteEntity {
    pub id: Uuid,
    #[serde(rename = "dispensaId")]
    pub pantry_id: Uuid,
    #[serde(rename = "convidadoPorId")]
    pub invited_by_id: Uuid,
    #[serde(rename = "convidadoId")]
    pub invitee_id: Uuid,
    pub status: RequestStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
