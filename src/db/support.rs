use crate::{models::SupportRequest, PGPool};

pub async fn create(request: &SupportRequest, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO support_requests (id, name, email, topic, message, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(request.id)
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.topic)
    .bind(&request.message)
    .bind(request.created_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}
