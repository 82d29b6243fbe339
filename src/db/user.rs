use sqlx::{postgres::PgQueryResult, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dto::UpdateUserDto,
    models::{Role, User, UserProfile},
    PGPool,
};

const PROFILE_COLUMNS: &str = "id, full_name, email, role, created_at";

pub async fn create(user: &User, pool: &PGPool) -> Result<PgQueryResult, sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, pwd_hash, full_name, position, department_id, manager_id, role, avatar_url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.pwd_hash)
    .bind(&user.full_name)
    .bind(&user.position)
    .bind(user.department_id)
    .bind(user.manager_id)
    .bind(user.role)
    .bind(&user.avatar_url)
    .bind(user.created_at)
    .execute(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_by_email(email: &str, pool: &PGPool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_email(email: &str, pool: &PGPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn get_profile(id: Uuid, pool: &PGPool) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_profiles(limit: i64, pool: &PGPool) -> Result<Vec<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users ORDER BY created_at LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Returns those of `ids` that belong to a user.
pub async fn existing_ids(ids: &[Uuid], pool: &PGPool) -> Result<Vec<Uuid>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn ids_by_department(department_id: Uuid, pool: &PGPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE department_id = $1 ORDER BY created_at")
        .bind(department_id)
        .fetch_all(pool)
        .await
}

pub async fn ids_by_role(role: Role, pool: &PGPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1 ORDER BY created_at")
        .bind(role)
        .fetch_all(pool)
        .await
}

pub async fn set_fields(id: Uuid, user_fields: UpdateUserDto, pool: &PGPool) -> Result<u64, sqlx::Error> {
    if user_fields.is_empty() {
        return Ok(0u64);
    }
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = query_builder.separated(", ");
    if let Some(v) = user_fields.refresh_token {
        separated.push("refresh_token = ").push_bind_unseparated(v);
    }
    if let Some(v) = user_fields.last_login {
        separated.push("last_login = ").push_bind_unseparated(v);
    }
    query_builder.push(" WHERE id = ").push_bind(id);

    let res = query_builder.build().execute(pool).await?;
    Ok(res.rows_affected())
}
