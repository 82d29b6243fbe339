use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::{
    dto::{LoginUserRequest, RefreshTokenRequest, RegisterUserDto, VerifyTokenRequest},
    service::{self, auth::jwt::JwtSecrets},
    PGPool,
};

use super::failure;

#[post("/register")]
pub async fn register(req: HttpRequest, dto: web::Json<RegisterUserDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::user::create(dto.into_inner(), conn).await {
        Ok(user) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "user registered",
            "user": user,
        })),
        Err(err) => failure(&req, err),
    }
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    dto: web::Json<LoginUserRequest>,
    pool_state: web::Data<PGPool>,
    secrets: web::Data<JwtSecrets>,
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::auth::jwt::login(dto.into_inner(), conn, secrets.get_ref()).await {
        Ok(val) => {
            info!("RESPONSE /AUTH/LOGIN: user {}", val.user.id);
            HttpResponse::Ok().json(json!({
                "status": "success",
                "token": val.token,
                "refreshToken": val.refresh_token,
                "user": val.user,
            }))
        }
        Err(err) => failure(&req, err),
    }
}

#[post("/verify-token")]
pub async fn verify_token(
    req: HttpRequest,
    dto: web::Json<VerifyTokenRequest>,
    pool_state: web::Data<PGPool>,
    secrets: web::Data<JwtSecrets>,
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::auth::jwt::verify(dto.into_inner().token, conn, secrets.get_ref()).await {
        Ok(user) => HttpResponse::Ok().json(json!({ "status": "success", "user": user })),
        Err(err) => failure(&req, err),
    }
}

#[post("/refresh-token")]
pub async fn refresh_token(
    req: HttpRequest,
    dto: web::Json<RefreshTokenRequest>,
    pool_state: web::Data<PGPool>,
    secrets: web::Data<JwtSecrets>,
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::auth::jwt::refresh(dto.into_inner().refresh_token, conn, secrets.get_ref()).await {
        Ok(token) => HttpResponse::Ok().json(json!({ "status": "success", "token": token })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(verify_token)
        .service(refresh_token);
}
