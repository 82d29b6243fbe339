use log::info;
use uuid::Uuid;

use crate::{
    db,
    dto::{ReadNotificationsDto, RespondNotificationDto},
    errors::ApiError,
    models::{InvitationStatus, Notification, NotificationDetails},
    PGPool,
};

use super::auth::UserAuthData;

/// Drops entries that are not UUIDs, keeps the rest in order.
pub fn parse_ids(dto: &ReadNotificationsDto) -> Vec<Uuid> {
    dto.ids
        .iter()
        .filter_map(|value| value.as_str())
        .filter_map(|raw| Uuid::parse_str(raw.trim()).ok())
        .collect()
}

/// Only an explicit accept or decline counts as a response.
pub fn parse_response(dto: &RespondNotificationDto) -> Result<(Uuid, InvitationStatus), ApiError> {
    let status = match dto.status.as_deref() {
        Some("accepted") => Some(InvitationStatus::Accepted),
        Some("declined") => Some(InvitationStatus::Declined),
        _ => None,
    };
    match (dto.id, status) {
        (Some(id), Some(status)) => Ok((id, status)),
        _ => Err(ApiError::bad_request("invalid request data")),
    }
}

pub async fn get_all(user_auth_data: &UserAuthData, pool: &PGPool) -> Result<Vec<Notification>, ApiError> {
    Ok(db::notifications::get_by_user(user_auth_data.user_id, pool).await?)
}

pub async fn get_by_id(id: Uuid, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<NotificationDetails, ApiError> {
    db::notifications::get_details(id, user_auth_data.user_id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("notification not found"))
}

/// Returns how many ids were submitted.
pub async fn mark_read(dto: ReadNotificationsDto, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<usize, ApiError> {
    let ids = parse_ids(&dto);
    if ids.is_empty() {
        return Err(ApiError::bad_request(
            "pass an array of notification ids to mark as read",
        ));
    }
    let updated = db::notifications::mark_read(&ids, user_auth_data.user_id, pool).await?;
    info!("user {} read {} notifications", user_auth_data.user_id, updated);
    Ok(ids.len())
}

/// Records the response on the notification and on the invitation of the
/// same event, if there is one.
pub async fn respond(dto: RespondNotificationDto, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<(), ApiError> {
    let (id, status) = parse_response(&dto)?;
    let event_id = db::notifications::set_response(id, user_auth_data.user_id, status, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("notification not found or not available to the user"))?;
    if let Some(event_id) = event_id {
        db::invitations::set_status(event_id, user_auth_data.user_id, status, pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_uuid_ids_are_dropped() {
        let id = Uuid::new_v4();
        let dto: ReadNotificationsDto =
            serde_json::from_value(json!({ "ids": [id.to_string(), "abc", 7, null] })).unwrap();
        assert_eq!(parse_ids(&dto), vec![id]);
    }

    #[test]
    fn missing_ids_parse_to_nothing() {
        let dto: ReadNotificationsDto = serde_json::from_value(json!({})).unwrap();
        assert!(parse_ids(&dto).is_empty());
    }

    #[test]
    fn response_must_be_accept_or_decline() {
        let id = Uuid::new_v4();
        let respond = |status: &str| RespondNotificationDto {
            id: Some(id),
            status: Some(status.to_string()),
        };
        assert_eq!(parse_response(&respond("accepted")).unwrap(), (id, InvitationStatus::Accepted));
        assert_eq!(parse_response(&respond("declined")).unwrap(), (id, InvitationStatus::Declined));
        assert!(parse_response(&respond("pending")).is_err());
        assert!(parse_response(&RespondNotificationDto::default()).is_err());
    }
}
