use uuid::Uuid;

use crate::{models::DepartmentSummary, PGPool};

pub async fn get_all(pool: &PGPool) -> Result<Vec<DepartmentSummary>, sqlx::Error> {
    sqlx::query_as::<_, DepartmentSummary>("SELECT id, name FROM departments ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn exists(id: Uuid, pool: &PGPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}
