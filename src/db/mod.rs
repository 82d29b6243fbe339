pub mod department;
pub mod event;
pub mod invitations;
pub mod news;
pub mod notifications;
pub mod support;
pub mod user;

use crate::PGPool;
use log::info;
use sqlx::postgres::PgPoolOptions;

pub async fn init_db_pool(db_url: &str, max_connections: u32) -> Result<PGPool, sqlx::Error> {
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await?;
    info!("connected to postgresql (max {} connections)", max_connections);
    Ok(pool)
}
