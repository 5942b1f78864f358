use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{FriendRequestRow, NewFriendRequest};
use crate::modules::friend::schema::{FriendRequestEntity, RequestStatus};
use crate::modules::user::model::UserResponse;

/// Friendship is derived: it exists while some request between the pair is
/// `accepted`.
#[async_trait::async_trait]
pub trait FriendRepository {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_friends(&self, user_id: &Uuid)
    -> Result<Vec<UserResponse>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    /// Pending request between the pair, in either direction.
    async fn find_pending_friend_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Pending requests sent by `user_id`, joined with the receiver profile.
    async fn find_friend_request_from_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError>;

    /// Pending requests addressed to `user_id`, joined with the sender profile.
    async fn find_friend_request_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestRow>, error::SystemError>;

    /// Inserts a pending request unless the pair is already friends, in which
    /// case nothing is written and `None` is returned. A concurrent pending
    /// duplicate surfaces as `Conflict`.
    async fn create_friend_request(
        &self,
        request: &NewFriendRequest,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRepo: FriendRepository + FriendRequestRepository + Send + Sync {
    /// Compare-and-set on the request status: only a `pending` row moves to
    /// `decision`. Returns `None` when the row was not pending anymore.
    async fn decide_friend_request_atomic(
        &self,
        request_id: &Uuid,
        decision: RequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;
}
