use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friend-requests")
            .service(send_friend_request)
            .service(list_incoming_requests)
            .service(list_outgoing_requests)
            .service(accept_friend_request)
            .service(reject_friend_request),
    )
    .service(scope("/friends").service(list_friends).service(friendship_status));
}
