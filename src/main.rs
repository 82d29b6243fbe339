use actix_web::{web, App, HttpServer};
use corporate_events::{
    config::Config,
    db::init_db_pool,
    handlers,
    service::{auth::AuthMiddleware, log::{init_logger, LoggerMiddleware}},
    PGPool,
};
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logger();
    let config = Config::from_env().map_err(|err| {
        error!("failed to load configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;
    let pool: PGPool = init_db_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(|err| {
            error!("failed to connect to postgresql: {:?}", err);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, err.to_string())
        })?;
    let secrets = config.jwt.clone();

    info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(secrets.clone()))
            .wrap(AuthMiddleware::new(secrets.clone()))
            .wrap(LoggerMiddleware)
            .configure(handlers::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
