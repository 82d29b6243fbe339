use uuid::Uuid;

use crate::{
    models::{Invitation, InvitationStatus},
    PGPool,
};

/// Returns 0 when the user already has an invitation to the event.
pub async fn create(invitation: &Invitation, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO invitations (id, event_id, user_id, status, comment, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (event_id, user_id) DO NOTHING",
    )
    .bind(invitation.id)
    .bind(invitation.event_id)
    .bind(invitation.user_id)
    .bind(invitation.status)
    .bind(&invitation.comment)
    .bind(invitation.created_at)
    .bind(invitation.updated_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn delete_by_event(event_id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM invitations WHERE event_id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn set_status(
    event_id: Uuid,
    user_id: Uuid,
    status: InvitationStatus,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE invitations SET status = $1, updated_at = now()
        WHERE event_id = $2 AND user_id = $3",
    )
    .bind(status)
    .bind(event_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}
