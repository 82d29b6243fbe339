use chrono::{DateTime, Utc};
use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use crate::{
    models::{Event, EventParticipant, EventType},
    PGPool,
};

/// Full replacement of the editable event columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EventChanges {
    pub title: String,
    pub event_type: EventType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_comment: Option<String>,
    pub event_date: DateTime<Utc>,
    pub is_announced: bool,
}

pub async fn create(event: &Event, pool: &PGPool) -> Result<PgQueryResult, sqlx::Error> {
    sqlx::query(
        "INSERT INTO events (id, title, type, description, organizer_id, location, location_comment, event_date, is_announced, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(event.event_type)
    .bind(&event.description)
    .bind(event.organizer_id)
    .bind(&event.location)
    .bind(&event.location_comment)
    .bind(event.event_date)
    .bind(event.is_announced)
    .bind(event.created_at)
    .execute(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY event_date ASC")
        .fetch_all(pool)
        .await
}

pub async fn get_by_organizer(organizer_id: Uuid, pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = $1 ORDER BY event_date DESC")
        .bind(organizer_id)
        .fetch_all(pool)
        .await
}

/// Everyone who was notified about the event, once per user.
/// A recorded response wins over a silent notification.
pub async fn get_participants(id: Uuid, pool: &PGPool) -> Result<Vec<EventParticipant>, sqlx::Error> {
    sqlx::query_as::<_, EventParticipant>(
        "SELECT DISTINCT ON (users.id)
            users.id AS user_id,
            users.full_name,
            users.email,
            users.role,
            departments.name AS department,
            notifications.response_status
        FROM notifications
        JOIN users ON notifications.user_id = users.id
        LEFT JOIN departments ON users.department_id = departments.id
        WHERE notifications.event_id = $1
        ORDER BY users.id, notifications.response_status IS NULL, notifications.created_at DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await
}

pub async fn update(id: Uuid, changes: &EventChanges, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE events
        SET title = $1, type = $2, description = $3, location = $4, location_comment = $5, event_date = $6, is_announced = $7
        WHERE id = $8",
    )
    .bind(&changes.title)
    .bind(changes.event_type)
    .bind(&changes.description)
    .bind(&changes.location)
    .bind(&changes.location_comment)
    .bind(changes.event_date)
    .bind(changes.is_announced)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
