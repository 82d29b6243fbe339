use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::{service, PGPool};

use super::failure;

#[get("/ping-users")]
pub async fn ping_users(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::user::ping(conn).await {
        Ok(users) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "database connection is alive",
            "users": users,
        })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ping_users);
}
