pub mod auth;
pub mod department;
pub mod event;
pub mod news;
pub mod notification;
pub mod support;
pub mod user;

use actix_web::{error, web, HttpRequest, HttpResponse};
use log::{error, warn};

use crate::errors::ApiError;

/// Mounts the whole JSON API under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .service(web::scope("/auth").configure(auth::init_routes))
            .service(web::scope("/events").configure(event::init_routes))
            .service(web::scope("/news").configure(news::init_routes))
            .service(web::scope("/notifications").configure(notification::init_routes))
            .service(web::scope("/departments").configure(department::init_routes))
            .service(web::scope("/support").configure(support::init_routes))
            .configure(user::init_routes)
            .default_service(web::to(not_found)),
    );
}

/// Logs a failed request and renders the error envelope.
pub(crate) fn failure(req: &HttpRequest, err: ApiError) -> HttpResponse {
    match &err {
        ApiError::Internal(_) => error!("{} {} failed: {:?}", req.method(), req.path(), err),
        _ => warn!("{} {} rejected: {}", req.method(), req.path(), err),
    }
    HttpResponse::from_error(err)
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("empty or malformed request body: {err}")).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("invalid id: {err}")).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request(format!("invalid query: {err}")).into()
}

async fn not_found() -> HttpResponse {
    HttpResponse::from_error(ApiError::not_found("route not found"))
}
