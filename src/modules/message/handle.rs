use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::repository_pg::FriendRepositoryPg,
        message::{
            model::{MarkedReadResponse, SendMessageBody, UnreadCountResponse},
            repository_pg::MessageRepositoryPg,
            schema::MessageEntity,
            service::MessageService,
        },
    },
    utils::ValidatedJson,
};

pub type MessageSvc = MessageService<MessageRepositoryPg, FriendRepositoryPg>;

#[post("")]
pub async fn send_message(
    message_service: web::Data<MessageSvc>,
    body: ValidatedJson<SendMessageBody>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let body = body.0;
    let message = message_service.send_message(sender_id, body.receiver_id, body.content).await?;

    Ok(success::Success::created(Some(message)).message("Message sent successfully"))
}

#[get("/conversation/{friend_id}")]
pub async fn get_conversation(
    message_service: web::Data<MessageSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<MessageEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let messages = message_service.get_conversation(user_id, *friend_id).await?;

    Ok(success::Success::ok(Some(messages)).message("Conversation retrieved successfully"))
}

#[post("/conversation/{friend_id}/read")]
pub async fn mark_conversation_read(
    message_service: web::Data<MessageSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<MarkedReadResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let updated = message_service.mark_conversation_read(user_id, *friend_id).await?;

    Ok(success::Success::ok(Some(MarkedReadResponse { updated })))
}

#[get("/unread/{friend_id}")]
pub async fn unread_count(
    message_service: web::Data<MessageSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<UnreadCountResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let count = message_service.unread_count(user_id, *friend_id).await?;

    Ok(success::Success::ok(Some(UnreadCountResponse { count })))
}

#[post("/{message_id}/read")]
pub async fn mark_read(
    message_service: web::Data<MessageSvc>,
    message_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<MessageEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let message = message_service.mark_read(*message_id, user_id).await?;

    Ok(success::Success::ok(Some(message)).message("Message marked as read"))
}
