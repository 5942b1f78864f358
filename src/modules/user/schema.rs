use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Public mirror of an identity-provider user. Never mutated by this service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
