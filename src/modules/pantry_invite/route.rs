use actix_web::web::{scope, ServiceConfig};

use crate::modules::pantry_invite::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/pantry-invites")
            .service(send_invite)
            .service(list_pending_invites)
            .service(accept_invite)
            .service(reject_invite),
    );
}
