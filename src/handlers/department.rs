use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::{service, PGPool};

use super::failure;

#[get("")]
pub async fn get_all(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::department::get_all(conn).await {
        Ok(departments) => HttpResponse::Ok().json(json!({
            "status": "success",
            "departments": departments,
        })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all);
}
