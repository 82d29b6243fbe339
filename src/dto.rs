use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{EventType, InvitationStatus, Role};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegisterUserDto {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VerifyTokenRequest {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: &Uuid, email: &str, role: Role, exp: usize) -> Self {
        Self {
            user_id: *user_id,
            email: email.to_string(),
            role,
            exp,
        }
    }
}

/// Session columns of `users` written on login.
#[derive(Clone, Default)]
pub struct UpdateUserDto {
    pub refresh_token: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UpdateUserDto {
    pub fn is_empty(&self) -> bool {
        self.refresh_token.is_none() && self.last_login.is_none()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewEventDto {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "event_date")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_comment: Option<String>,
    pub is_announced: Option<bool>,
    pub participants: Option<Vec<Uuid>>,
    #[serde(rename = "notifyAll", default)]
    pub notify_all: bool,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "event_date")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_comment: Option<String>,
    pub is_announced: Option<bool>,
    pub participants: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AddParticipantDto {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<InvitationStatus>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OrganizerQuery {
    pub organizer_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthorQuery {
    pub author_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewNewsDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub event_id: Option<Uuid>,
    pub image_url: Option<String>,
}

/// Ids arrive loosely typed; entries that are not UUIDs are dropped.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReadNotificationsDto {
    #[serde(default)]
    pub ids: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RespondNotificationDto {
    pub id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewSupportRequestDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub topic: Option<String>,
    pub message: Option<String>,
}

const NAIVE_DATE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// RFC 3339, or a date-time without offset (as sent by `datetime-local`
/// inputs) taken as UTC.
fn event_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date.with_timezone(&Utc)));
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .ok_or_else(|| de::Error::custom(format!("invalid event_date '{raw}'")))
}

/// Trimmed value of a required text field, `None` when absent or blank.
pub fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Like [`required`] but for optional columns: blank becomes NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    required(&value)
}
