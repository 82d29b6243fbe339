use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::{AddParticipantDto, NewEventDto, OrganizerQuery, UpdateEventDto},
    service::{self, auth::current_user},
    PGPool,
};

use super::failure;

#[get("")]
pub async fn get_all(req: HttpRequest, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::event::get_all(conn).await {
        Ok(events) => HttpResponse::Ok().json(json!({ "status": "success", "data": events })),
        Err(err) => failure(&req, err),
    }
}

#[post("")]
pub async fn create(req: HttpRequest, new_event_dto: web::Json<NewEventDto>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::event::create(&user_auth_data, new_event_dto.into_inner(), conn).await {
        Ok(event_id) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "event created",
            "eventId": event_id,
        })),
        Err(err) => failure(&req, err),
    }
}

#[get("/by-user")]
pub async fn get_by_user(req: HttpRequest, query: web::Query<OrganizerQuery>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    match service::event::get_by_organizer(query.into_inner(), conn).await {
        Ok(events) => HttpResponse::Ok().json(json!({ "status": "success", "events": events })),
        Err(err) => failure(&req, err),
    }
}

#[post("/participants")]
pub async fn add_participant(
    req: HttpRequest,
    dto: web::Json<AddParticipantDto>,
    pool_state: web::Data<PGPool>,
) -> impl Responder {
    let conn: &PGPool = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::event::add_participant(dto.into_inner(), &user_auth_data, conn).await {
        Ok(invitation_id) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "invitation created",
            "invitationId": invitation_id,
        })),
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
    match service::event::get_details(id.into_inner(), &user_auth_data, conn).await {
        Ok((event, participants)) => HttpResponse::Ok().json(json!({
            "status": "success",
            "event": event,
            "participants": participants,
        })),
        Err(err) => failure(&req, err),
    }
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    id: web::Path<Uuid>,
    update_event_dto: web::Json<UpdateEventDto>,
    pool_state: web::Data<PGPool>,
) -> impl Responder {
    let conn = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::event::update(id.into_inner(), update_event_dto.into_inner(), &user_auth_data, conn).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "success", "message": "event updated" })),
        Err(err) => failure(&req, err),
    }
}

#[delete("/{id}")]
pub async fn remove(req: HttpRequest, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> impl Responder {
    let conn = pool_state.get_ref();
    let user_auth_data = match current_user(&req) {
        Ok(user_auth_data) => user_auth_data,
        Err(err) => return failure(&req, err),
    };
    match service::event::delete(id.into_inner(), &user_auth_data, conn).await {
        Ok(notified) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "event deleted and participants notified",
            "notified": notified,
        })),
        Err(err) => failure(&req, err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_by_user)
        .service(add_participant)
        .service(get_all)
        .service(create)
        .service(get_by_id)
        .service(update)
        .service(remove);
}
