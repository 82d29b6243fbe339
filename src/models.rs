use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Meeting,
    Conference,
    Workshop,
    MeetingIndividual,
    MeetingDepartment,
}

impl EventType {
    /// Individual and department meetings invite a fixed audience.
    pub fn is_targeted(self) -> bool {
        matches!(self, EventType::MeetingIndividual | EventType::MeetingDepartment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    EventInvite,
    EventAnnounce,
    EventUpdated,
    EventCancelled,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub pwd_hash: String,
    pub full_name: String,
    pub position: Option<String>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub role: Role,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Public part of a user row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepartmentSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub event_type: EventType,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub location: Option<String>,
    pub location_comment: Option<String>,
    pub event_date: DateTime<Utc>,
    pub is_announced: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventParticipant {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub response_status: Option<InvitationStatus>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invitation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatus,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(event_id: Uuid, user_id: Uuid, status: InvitationStatus, comment: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status,
            comment,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pending(event_id: Uuid, user_id: Uuid) -> Self {
        Self::new(event_id, user_id, InvitationStatus::Pending, None)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    pub is_read: bool,
    pub response_status: Option<InvitationStatus>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, event_id: Option<Uuid>, message: String, kind: NotificationType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            event_id,
            message,
            kind,
            is_read: false,
            response_status: None,
            scheduled_time: None,
            created_at: Utc::now(),
        }
    }
}

/// A notification joined with the event it points to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationDetails {
    pub id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub response_status: Option<InvitationStatus>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    pub event_title: Option<String>,
    pub event_type: Option<EventType>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub location_comment: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub event_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupportRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub topic: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
