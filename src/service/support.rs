use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::{
    db,
    dto::{required, NewSupportRequestDto},
    errors::ApiError,
    models::SupportRequest,
    PGPool,
};

pub fn build(dto: &NewSupportRequestDto) -> Result<SupportRequest, ApiError> {
    match (
        required(&dto.name),
        required(&dto.email),
        required(&dto.topic),
        required(&dto.message),
    ) {
        (Some(name), Some(email), Some(topic), Some(message)) => Ok(SupportRequest {
            id: Uuid::new_v4(),
            name,
            email,
            topic,
            message,
            created_at: Utc::now(),
        }),
        _ => Err(ApiError::bad_request("all fields are required")),
    }
}

pub async fn create(dto: NewSupportRequestDto, pool: &PGPool) -> Result<Uuid, ApiError> {
    let request = build(&dto)?;
    db::support::create(&request, pool).await?;
    info!("support request {} saved ({})", request.id, request.topic);
    Ok(request.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required() {
        let dto = NewSupportRequestDto {
            name: Some("Ann".to_string()),
            email: Some("ann@corp.io".to_string()),
            topic: Some("Access".to_string()),
            message: None,
        };
        assert_eq!(build(&dto).unwrap_err(), ApiError::bad_request("all fields are required"));
    }
}
