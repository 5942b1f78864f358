use actix_web::web::{scope, ServiceConfig};

use crate::modules::message::handle::*;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/messages")
            .service(send_message)
            .service(get_conversation)
            .service(mark_conversation_read)
            .service(unread_count)
            .service(mark_read),
    );
}
