use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::{AuthorQuery, NewNewsDto},
    service::{self, auth::current_user},
    PGPool,
};

use super::failure;

#[get("")]
pub async fn get_all(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::news::get_all(conn).await {
        Ok(news) => HttpResponse::Ok().json(json!({ "status": "success", "data": news })),
        Err(err) => failure(&req, err),
    }
}

#[get("/by-user")]
pub async fn get_by_user(req: HttpRequest, query: web::Query<AuthorQuery>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::news::get_by_author(query.into_inner(), conn).await {
        Ok(news) => HttpResponse::Ok().json(json!({ "status": "success", "news": news })),
        Err(err) => failure(&req, err),
    }
}

#[post("")]
pub async fn create(req: HttpRequest, dto: web::Json<NewNewsDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::news::create(dto.into_inner(), &user_auth_data, conn).await {
        Ok(news_id) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "news published",
            "newsId": news_id,
        })),
        Err(err) => failure(&req, err),
    }
}

#[delete("/{id}")]
pub async fn remove(req: HttpRequest, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::news::delete(id.into_inner(), &user_auth_data, conn).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "success", "message": "news deleted" })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_by_user)
        .service(get_all)
        .service(create)
        .service(remove);
}
