use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_MESSAGE_LENGTH;

const MAX_MESSAGE_LENGTH_U64: u64 = MAX_MESSAGE_LENGTH as u64;

#[derive(Debug, Clone)]
pub struct InsertMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    pub receiver_id: Uuid,
    #[validate(length(
        min = 1,
        max = MAX_MESSAGE_LENGTH_U64,
        message = "Message content must be 1 to 2000 characters"
    ))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkedReadResponse {
    pub updated: u64,
}
