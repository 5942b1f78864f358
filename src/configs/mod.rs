use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, ENV};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = PgPoolOptions::new()
        .max_connections(ENV.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations applied");

    Ok(pool)
}

/// `log` records go through env_logger (filtered by `RUST_LOG`), service
/// `tracing` events through the fmt subscriber at INFO and above.
pub fn init_logging() {
    env_logger::init();

    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        log::warn!("A global tracing subscriber was already installed");
    }
}
