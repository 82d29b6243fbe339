use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::{ReadNotificationsDto, RespondNotificationDto},
    service::{self, auth::current_user},
    PGPool,
};

use super::failure;

#[get("")]
pub async fn get_all(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::notification::get_all(&user_auth_data, conn).await {
        Ok(notifications) => HttpResponse::Ok().json(json!({
            "status": "success",
            "notifications": notifications,
        })),
        Err(err) => failure(&req, err),
    }
}

#[post("/read")]
pub async fn read(req: HttpRequest, dto: web::Json<ReadNotificationsDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::notification::mark_read(dto.into_inner(), &user_auth_data, conn).await {
        Ok(count) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": format!("notifications updated: {count}"),
        })),
        Err(err) => failure(&req, err),
    }
}

#[post("/respond")]
pub async fn respond(req: HttpRequest, dto: web::Json<RespondNotificationDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::notification::respond(dto.into_inner(), &user_auth_data, conn).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "success", "message": "response saved" })),
        Err(err) => failure(&req, err),
    }
}

#[get("/{id}")]
pub async fn get_by_id(req: HttpRequest, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::notification::get_by_id(id.into_inner(), &user_auth_data, conn).await {
        Ok(notification) => HttpResponse::Ok().json(json!({
            "status": "success",
            "notification": notification,
        })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all)
        .service(read)
        .service(respond)
        .service(get_by_id);
}
