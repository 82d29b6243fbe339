use uuid::Uuid;

use crate::{models::News, PGPool};

pub async fn create(news: &News, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO news (id, title, content, event_id, image_url, author_id, published_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(news.id)
    .bind(&news.title)
    .bind(&news.content)
    .bind(news.event_id)
    .bind(&news.image_url)
    .bind(news.author_id)
    .bind(news.published_at)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<News>, sqlx::Error> {
    sqlx::query_as::<_, News>("SELECT * FROM news ORDER BY published_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_by_author(author_id: Uuid, pool: &PGPool) -> Result<Vec<News>, sqlx::Error> {
    sqlx::query_as::<_, News>("SELECT * FROM news WHERE author_id = $1 ORDER BY published_at DESC")
        .bind(author_id)
        .fetch_all(pool)
        .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Option<News>, sqlx::Error> {
    sqlx::query_as::<_, News>("SELECT * FROM news WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
