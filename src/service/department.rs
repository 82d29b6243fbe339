use crate::{db, errors::ApiError, models::DepartmentSummary, PGPool};

pub async fn get_all(pool: &PGPool) -> Result<Vec<DepartmentSummary>, ApiError> {
    Ok(db::department::get_all(pool).await?)
}
