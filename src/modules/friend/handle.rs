use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_actor, get_claims},
    modules::{
        friend::{
            model::{
                FriendRequestBody, FriendRequestResponse, FriendshipStatus, IncomingRequestsQuery,
            },
            repository_pg::FriendRepositoryPg,
            schema::FriendRequestEntity,
            service::FriendService,
        },
        user::{model::UserResponse, repository_pg::UserRepositoryPg},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[post("")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_friend_request(sender_id, body.0.receiver_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[get("")]
pub async fn list_incoming_requests(
    friend_service: web::Data<FriendSvc>,
    query: ValidatedQuery<IncomingRequestsQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_actor(&req, query.0.user_id)?;
    let requests = friend_service.get_incoming_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/outgoing")]
pub async fn list_outgoing_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_outgoing_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)).message("Sent friend requests retrieved successfully"))
}

#[post("/{request_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<UserResponse>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let friend = friend_service.accept_friend_request(receiver_id, *request_id).await?;

    Ok(success::Success::ok(Some(friend)).message("Friend request accepted successfully"))
}

#[post("/{request_id}/reject")]
pub async fn reject_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let receiver_id = get_claims(&req)?.sub;
    let request = friend_service.reject_friend_request(receiver_id, *request_id).await?;

    Ok(success::Success::ok(Some(request)).message("Friend request rejected"))
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/{other_id}")]
pub async fn friendship_status(
    friend_service: web::Data<FriendSvc>,
    other_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendshipStatus>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let is_friend = friend_service.is_friend(user_id, *other_id).await?;

    Ok(success::Success::ok(Some(FriendshipStatus { is_friend })))
}
