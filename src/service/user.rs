use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    db,
    dto::{optional, required, RegisterUserDto},
    errors::ApiError,
    models::{Role, User, UserProfile},
    PGPool,
};

use super::crypto;

const MIN_PASSWORD_LEN: usize = 8;
const PING_LIMIT: i64 = 5;

/// Checks a registration request and builds the new employee row.
pub fn build(dto: RegisterUserDto) -> Result<User, ApiError> {
    let (email, full_name) = match (required(&dto.email), required(&dto.full_name)) {
        (Some(email), Some(full_name)) => (email.to_lowercase(), full_name),
        _ => return Err(ApiError::bad_request("email and full name are required")),
    };
    if !email.contains('@') {
        return Err(ApiError::bad_request("invalid email"));
    }
    let password = dto.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if dto.password_confirm.as_deref() != Some(password.as_str()) {
        return Err(ApiError::bad_request("passwords do not match"));
    }

    Ok(User {
        id: Uuid::new_v4(),
        email,
        pwd_hash: crypto::hash_password(&password),
        full_name,
        position: optional(dto.position),
        department_id: dto.department_id,
        manager_id: None,
        role: Role::Employee,
        avatar_url: None,
        refresh_token: None,
        created_at: Utc::now(),
        last_login: None,
    })
}

pub async fn create(dto: RegisterUserDto, pool: &PGPool) -> Result<UserProfile, ApiError> {
    let user = build(dto)?;
    if db::user::exists_by_email(&user.email, pool).await? {
        return Err(ApiError::bad_request(format!("user with email {} already exists", user.email)));
    }
    if let Some(department_id) = user.department_id {
        if !db::department::exists(department_id, pool).await? {
            return Err(ApiError::bad_request("unknown department"));
        }
    }
    db::user::create(&user, pool).await?;
    info!("user {} registered", user.id);
    Ok(user.into())
}

/// A few profiles, proving the database answers.
pub async fn ping(pool: &PGPool) -> Result<Vec<UserProfile>, ApiError> {
    Ok(db::user::list_profiles(PING_LIMIT, pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> RegisterUserDto {
        RegisterUserDto {
            email: Some(" Ann@Corp.io ".to_string()),
            password: Some("long-enough".to_string()),
            password_confirm: Some("long-enough".to_string()),
            full_name: Some("Ann Smith".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn new_users_are_employees_with_hashed_password() {
        let user = build(dto()).unwrap();
        assert_eq!(user.email, "ann@corp.io");
        assert_eq!(user.role, Role::Employee);
        assert_ne!(user.pwd_hash, "long-enough");
        assert!(crypto::verify_password("long-enough", &user.pwd_hash));
    }

    #[test]
    fn passwords_must_match() {
        let mut dto = dto();
        dto.password_confirm = Some("something-else".to_string());
        assert_eq!(build(dto).unwrap_err(), ApiError::bad_request("passwords do not match"));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut dto = dto();
        dto.password = Some("short".to_string());
        dto.password_confirm = Some("short".to_string());
        assert!(build(dto).is_err());
    }

    #[test]
    fn email_is_required() {
        let mut dto = dto();
        dto.email = None;
        assert!(build(dto).is_err());
    }
}
