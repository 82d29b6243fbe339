use uuid::Uuid;

use crate::{
    models::{InvitationStatus, Notification, NotificationDetails},
    PGPool,
};

pub async fn create(notification: &Notification, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO notifications (id, user_id, event_id, message, type, is_read, response_status, scheduled_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(notification.id)
    .bind(notification.user_id)
    .bind(notification.event_id)
    .bind(&notification.message)
    .bind(notification.kind)
    .bind(notification.is_read)
    .bind(notification.response_status)
    .bind(notification.scheduled_time)
    .bind(notification.created_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn get_by_user(user_id: Uuid, pool: &PGPool) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_details(id: Uuid, user_id: Uuid, pool: &PGPool) -> Result<Option<NotificationDetails>, sqlx::Error> {
    sqlx::query_as::<_, NotificationDetails>(
        "SELECT
            notifications.id,
            notifications.message,
            notifications.is_read,
            notifications.response_status,
            notifications.created_at,
            notifications.type,
            events.title AS event_title,
            events.type AS event_type,
            events.event_date,
            events.location,
            events.location_comment
        FROM notifications
        LEFT JOIN events ON notifications.event_id = events.id
        WHERE notifications.user_id = $1 AND notifications.id = $2",
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn user_ids_by_event(event_id: Uuid, pool: &PGPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT DISTINCT user_id FROM notifications WHERE event_id = $1")
        .bind(event_id)
        .fetch_all(pool)
        .await
}

pub async fn mark_read(ids: &[Uuid], user_id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ANY($1) AND user_id = $2")
        .bind(ids)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

/// Stores the response; `None` when the notification is not the user's.
/// The inner option is the event the notification points to.
pub async fn set_response(
    id: Uuid,
    user_id: Uuid,
    status: InvitationStatus,
    pool: &PGPool,
) -> Result<Option<Option<Uuid>>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<Uuid>>(
        "UPDATE notifications SET response_status = $1
        WHERE id = $2 AND user_id = $3
        RETURNING event_id",
    )
    .bind(status)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
