use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestResponse, NewFriendRequest},
            repository::FriendRepo,
            schema::{FriendRequestEntity, RequestStatus},
        },
        user::{model::UserResponse, repository::UserRepository},
    },
};

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        FriendService { friend_repo, user_repo }
    }

    pub async fn is_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        if user_id == friend_id {
            return Ok(false);
        }
        let friendship = self.friend_repo.find_friendship(&user_id, &friend_id).await?;
        Ok(friendship.is_some())
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        self.friend_repo.find_friends(&user_id).await
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestResponse, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::invalid_argument(
                "Cannot send friend request to yourself",
            ));
        }

        let (sender, receiver) = tokio::try_join!(
            self.user_repo.find_by_id(&sender_id),
            self.user_repo.find_by_id(&receiver_id),
        )?;

        let sender = sender.ok_or_else(|| error::SystemError::not_found("Sender user not found"))?;
        let receiver =
            receiver.ok_or_else(|| error::SystemError::not_found("Receiver user not found"))?;

        let (friendship, pending) = tokio::try_join!(
            self.friend_repo.find_friendship(&sender_id, &receiver_id),
            self.friend_repo.find_pending_friend_request(&sender_id, &receiver_id),
        )?;

        if friendship.is_some() {
            return Err(error::SystemError::conflict("Users are already friends"));
        }

        if pending.is_some() {
            return Err(error::SystemError::conflict("A pending friend request already exists"));
        }

        let request = self
            .friend_repo
            .create_friend_request(&NewFriendRequest {
                id: Uuid::now_v7(),
                sender_id,
                receiver_id,
            })
            .await?
            .ok_or_else(|| error::SystemError::conflict("Users are already friends"))?;

        tracing::info!("Friend request {} sent from {} to {}", request.id, sender_id, receiver_id);

        Ok(FriendRequestResponse {
            request,
            sender: Some(sender.into()),
            receiver: Some(receiver.into()),
        })
    }

    /// Accepts a pending request addressed to `user_id` and returns the
    /// profile of the new friend.
    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<UserResponse, error::SystemError> {
        let request = self.decide(user_id, request_id, RequestStatus::Accepted).await?;

        let friend = self
            .user_repo
            .find_by_id(&request.sender_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(UserResponse::from(friend))
    }

    pub async fn reject_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        self.decide(user_id, request_id, RequestStatus::Rejected).await
    }

    pub async fn get_incoming_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self.friend_repo.find_friend_request_to_user(&user_id).await?;
        Ok(rows.into_iter().map(FriendRequestResponse::incoming).collect())
    }

    pub async fn get_outgoing_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self.friend_repo.find_friend_request_from_user(&user_id).await?;
        Ok(rows.into_iter().map(FriendRequestResponse::outgoing).collect())
    }

    async fn decide(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        decision: RequestStatus,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = self
            .friend_repo
            .find_friend_request_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.receiver_id != user_id {
            return Err(error::SystemError::forbidden(
                "Only the receiver can decide on this friend request",
            ));
        }

        if !request.status.is_pending() {
            return Err(error::SystemError::conflict(format!(
                "Friend request was already {}",
                request.status.as_str()
            )));
        }

        // another decision may land between the read above and this update
        let decided = self
            .friend_repo
            .decide_friend_request_atomic(&request_id, decision)
            .await?
            .ok_or_else(|| error::SystemError::conflict("Friend request was already decided"))?;

        tracing::info!("Friend request {} {} by {}", request_id, decision.as_str(), user_id);

        Ok(decided)
    }
}
