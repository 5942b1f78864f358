use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{
    friend::schema::{FriendRequestEntity, RequestStatus},
    user::model::UserResponse,
};

#[derive(Debug, Clone)]
pub struct NewFriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

/// A pending request joined with the profile of the other party.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendRequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
}

impl FriendRequestRow {
    fn split(self) -> (FriendRequestEntity, UserResponse) {
        (
            FriendRequestEntity {
                id: self.id,
                sender_id: self.sender_id,
                receiver_id: self.receiver_id,
                status: self.status,
                created_at: self.created_at,
            },
            UserResponse { id: self.user_id, name: self.user_name, email: self.user_email },
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    #[serde(flatten)]
    pub request: FriendRequestEntity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserResponse>,
}

impl FriendRequestResponse {
    pub fn incoming(row: FriendRequestRow) -> Self {
        let (request, sender) = row.split();
        FriendRequestResponse { request, sender: Some(sender), receiver: None }
    }

    pub fn outgoing(row: FriendRequestRow) -> Self {
        let (request, receiver) = row.split();
        FriendRequestResponse { request, sender: None, receiver: Some(receiver) }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IncomingRequestsQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipStatus {
    pub is_friend: bool,
}
