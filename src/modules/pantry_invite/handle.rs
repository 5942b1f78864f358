use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::{get_actor, get_claims},
    modules::{
        pantry_invite::{
            model::{AcceptedInviteResponse, PantryInviteResponse, SendInviteBody},
            repository_pg::PantryInviteRepositoryPg,
            schema::PantryInviteEntity,
            service::PantryInviteService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type PantryInviteSvc = PantryInviteService<PantryInviteRepositoryPg, UserRepositoryPg>;

#[post("")]
pub async fn send_invite(
    invite_service: web::Data<PantryInviteSvc>,
    body: ValidatedJson<SendInviteBody>,
    req: HttpRequest,
) -> Result<success::Success<PantryInviteResponse>, error::Error> {
    let inviter_id = get_claims(&req)?.sub;
    let body = body.0;
    let invite = invite_service.send_invite(inviter_id, body.pantry_id, body.invitee_id).await?;

    Ok(success::Success::created(Some(invite)).message("Invite sent successfully"))
}

#[get("/{user_id}")]
pub async fn list_pending_invites(
    invite_service: web::Data<PantryInviteSvc>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PantryInviteResponse>>, error::Error> {
    let user_id = get_actor(&req, Some(*user_id))?;
    let invites = invite_service.get_pending_invites(user_id).await?;

    Ok(success::Success::ok(Some(invites)).message("Pending invites retrieved successfully"))
}

#[post("/{invite_id}/accept")]
pub async fn accept_invite(
    invite_service: web::Data<PantryInviteSvc>,
    invite_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AcceptedInviteResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let pantry = invite_service.accept_invite(user_id, *invite_id).await?;

    Ok(success::Success::ok(Some(AcceptedInviteResponse { pantry })).message("Invite accepted"))
}

#[post("/{invite_id}/reject")]
pub async fn reject_invite(
    invite_service: web::Data<PantryInviteSvc>,
    invite_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PantryInviteEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let invite = invite_service.reject_invite(user_id, *invite_id).await?;

    Ok(success::Success::ok(Some(invite)).message("Invite rejected"))
}
