use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use crate::{dto::NewSupportRequestDto, service, PGPool};

use super::failure;

#[post("")]
pub async fn create(req: HttpRequest, dto: web::Json<NewSupportRequestDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::support::create(dto.into_inner(), conn).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "success", "message": "request saved" })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create);
}
