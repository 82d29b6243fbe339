use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::{
    db::{self, event::EventChanges},
    dto::{optional, required, AddParticipantDto, NewEventDto, OrganizerQuery, UpdateEventDto},
    errors::ApiError,
    models::{Event, EventParticipant, EventType, Invitation, InvitationStatus, Notification, NotificationType, Role},
    PGPool,
};

use super::{
    auth::UserAuthData,
    fanout,
    permission::{self, Permissions},
};

/// Who a new event is addressed to.
#[derive(Debug, Clone, PartialEq)]
pub enum Audience {
    Participants(Vec<Uuid>),
    Department(Uuid),
    Open { notify_all: bool },
}

/// A checked creation request; nothing has been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub event_type: EventType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub location_comment: Option<String>,
    pub event_date: DateTime<Utc>,
    pub is_announced: bool,
    pub audience: Audience,
}

impl EventDraft {
    fn into_event(self, organizer_id: Uuid) -> (Event, Audience) {
        let event = Event {
            id: Uuid::new_v4(),
            title: self.title,
            event_type: self.event_type,
            description: self.description,
            organizer_id,
            location: self.location,
            location_comment: self.location_comment,
            event_date: self.event_date,
            is_announced: self.is_announced,
            created_at: Utc::now(),
        };
        (event, self.audience)
    }
}

pub fn validate_new_event(dto: NewEventDto) -> Result<EventDraft, ApiError> {
    let (title, event_date) = match (required(&dto.title), dto.event_date) {
        (Some(title), Some(event_date)) => (title, event_date),
        _ => return Err(ApiError::bad_request("not enough data to create the event")),
    };
    let event_type = dto.event_type.unwrap_or_default();
    let audience = match event_type {
        EventType::MeetingIndividual => match dto.participants {
            Some(participants) if !participants.is_empty() => Audience::Participants(participants),
            _ => {
                return Err(ApiError::bad_request(
                    "participants are required for an individual meeting",
                ))
            }
        },
        EventType::MeetingDepartment => match dto.department_id {
            Some(department_id) => Audience::Department(department_id),
            None => {
                return Err(ApiError::bad_request(
                    "a department is required for a department meeting",
                ))
            }
        },
        _ => Audience::Open { notify_all: dto.notify_all },
    };

    Ok(EventDraft {
        title,
        event_type,
        description: optional(dto.description),
        location: optional(dto.location),
        location_comment: optional(dto.location_comment),
        event_date,
        is_announced: dto.is_announced.unwrap_or(false),
        audience,
    })
}

pub fn validate_update(dto: &UpdateEventDto) -> Result<EventChanges, ApiError> {
    match (required(&dto.title), dto.event_date) {
        (Some(title), Some(event_date)) => Ok(EventChanges {
            title,
            event_type: dto.event_type.unwrap_or_default(),
            description: optional(dto.description.clone()),
            location: optional(dto.location.clone()),
            location_comment: optional(dto.location_comment.clone()),
            event_date,
            is_announced: dto.is_announced.unwrap_or(false),
        }),
        _ => Err(ApiError::bad_request("not enough data to update the event")),
    }
}

/// Keeps the first occurrence of every id that is also in `existing`.
fn known_in_order(requested: &[Uuid], existing: &[Uuid]) -> Vec<Uuid> {
    requested.iter().copied().filter(|id| existing.contains(id)).collect()
}

/// Inserts the event, then one invitation + notification per invited user
/// and one announcement per remaining employee. Rows are written one by one
/// outside a transaction. Any signed-in user may create events.
pub async fn create(user_auth_data: &UserAuthData, dto: NewEventDto, pool: &PGPool) -> Result<Uuid, ApiError> {
    let draft = validate_new_event(dto)?;
    let (event, audience) = draft.into_event(user_auth_data.user_id);
    db::event::create(&event, pool).await?;

    let (targeted, notify_all) = match &audience {
        Audience::Participants(requested) => {
            let existing = db::user::existing_ids(requested, pool).await?;
            (known_in_order(requested, &existing), false)
        }
        Audience::Department(department_id) => (db::user::ids_by_department(*department_id, pool).await?, false),
        Audience::Open { notify_all } => (Vec::new(), *notify_all),
    };
    let employees = if notify_all {
        db::user::ids_by_role(Role::Employee, pool).await?
    } else {
        Vec::new()
    };
    let plan = fanout::plan(event.event_type, &targeted, notify_all, &employees);

    let invite_text = fanout::invite_message(event.event_type, &event.title);
    for user_id in &plan.invited {
        db::invitations::create(&Invitation::pending(event.id, *user_id), pool).await?;
        let notification = Notification::new(*user_id, Some(event.id), invite_text.clone(), NotificationType::EventInvite);
        db::notifications::create(&notification, pool).await?;
    }
    let announce_text = fanout::announce_message(&event.title);
    for user_id in &plan.announced {
        let notification = Notification::new(*user_id, Some(event.id), announce_text.clone(), NotificationType::EventAnnounce);
        db::notifications::create(&notification, pool).await?;
    }

    info!(
        "event {} created by {}: {} invited, {} announced",
        event.id,
        user_auth_data.user_id,
        plan.invited.len(),
        plan.announced.len()
    );
    Ok(event.id)
}

pub async fn get_all(pool: &PGPool) -> Result<Vec<Event>, ApiError> {
    Ok(db::event::get_all(pool).await?)
}

pub async fn get_by_organizer(query: OrganizerQuery, pool: &PGPool) -> Result<Vec<Event>, ApiError> {
    let organizer_id = query
        .organizer_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .ok_or_else(|| ApiError::bad_request("invalid organizer_id"))?;
    Ok(db::event::get_by_organizer(organizer_id, pool).await?)
}

async fn find(id: Uuid, pool: &PGPool) -> Result<Event, ApiError> {
    db::event::get_by_id(id, pool)
        .await?
        .ok_or_else(|| ApiError::not_found("event not found"))
}

pub async fn get_details(
    id: Uuid,
    user_auth_data: &UserAuthData,
    pool: &PGPool,
) -> Result<(Event, Vec<EventParticipant>), ApiError> {
    let event = find(id, pool).await?;
    permission::ensure_owner_or(
        user_auth_data,
        event.organizer_id,
        Permissions::MANAGE_ANY_EVENT,
        "not enough rights to view the event",
    )?;
    let participants = db::event::get_participants(id, pool).await?;
    Ok((event, participants))
}

/// Replaces the event fields. For plain and individual meetings a given
/// participant list replaces the invitations, and each participant is told
/// about the change.
pub async fn update(
    id: Uuid,
    dto: UpdateEventDto,
    user_auth_data: &UserAuthData,
    pool: &PGPool,
) -> Result<(), ApiError> {
    let changes = validate_update(&dto)?;
    let event = find(id, pool).await?;
    permission::ensure_owner_or(
        user_auth_data,
        event.organizer_id,
        Permissions::MANAGE_ANY_EVENT,
        "not enough rights to edit the event",
    )?;

    if db::event::update(id, &changes, pool).await? == 0 {
        return Err(ApiError::not_found("event not found"));
    }

    let replaces_participants = matches!(changes.event_type, EventType::Meeting | EventType::MeetingIndividual);
    if let (true, Some(requested)) = (replaces_participants, dto.participants) {
        let existing = db::user::existing_ids(&requested, pool).await?;
        let participants = fanout::plan(EventType::MeetingIndividual, &known_in_order(&requested, &existing), false, &[]).invited;

        db::invitations::delete_by_event(id, pool).await?;
        let text = fanout::update_message(&changes.title);
        for user_id in &participants {
            db::invitations::create(&Invitation::pending(id, *user_id), pool).await?;
            let notification = Notification::new(*user_id, Some(id), text.clone(), NotificationType::EventUpdated);
            db::notifications::create(&notification, pool).await?;
        }
        info!("event {} participants replaced: {}", id, participants.len());
    }
    Ok(())
}

/// Deletes the event and sends a cancellation to everyone notified about it.
/// Returns the number of users notified.
pub async fn delete(id: Uuid, user_auth_data: &UserAuthData, pool: &PGPool) -> Result<usize, ApiError> {
    let event = find(id, pool).await?;
    permission::ensure_owner_or(
        user_auth_data,
        event.organizer_id,
        Permissions::MANAGE_ANY_EVENT,
        "not enough rights to delete the event",
    )?;

    let related_users = db::notifications::user_ids_by_event(id, pool).await?;
    if db::event::delete(id, pool).await? == 0 {
        return Err(ApiError::not_found("event not found or already deleted"));
    }

    // the event row is gone, so the cancellation cannot reference it
    let text = fanout::cancel_message(&event.title);
    for user_id in &related_users {
        let notification = Notification::new(*user_id, None, text.clone(), NotificationType::EventCancelled);
        db::notifications::create(&notification, pool).await?;
    }
    info!("event {} deleted by {}, {} users notified", id, user_auth_data.user_id, related_users.len());
    Ok(related_users.len())
}

/// Adds one invitation (and its notification) to an existing event.
/// A user already invited gets neither.
pub async fn add_participant(
    dto: AddParticipantDto,
    user_auth_data: &UserAuthData,
    pool: &PGPool,
) -> Result<Uuid, ApiError> {
    let (event_id, user_id) = match (dto.event_id, dto.user_id) {
        (Some(event_id), Some(user_id)) => (event_id, user_id),
        _ => return Err(ApiError::bad_request("not enough data to create the invitation")),
    };
    let event = find(event_id, pool).await?;
    permission::ensure_owner_or(
        user_auth_data,
        event.organizer_id,
        Permissions::MANAGE_ANY_EVENT,
        "not enough rights to invite to the event",
    )?;
    if db::user::get_profile(user_id, pool).await?.is_none() {
        return Err(ApiError::not_found("user not found"));
    }

    let invitation = Invitation::new(
        event_id,
        user_id,
        dto.status.unwrap_or(InvitationStatus::Pending),
        optional(dto.comment),
    );
    if db::invitations::create(&invitation, pool).await? == 0 {
        return Err(ApiError::bad_request("the user is already invited to the event"));
    }
    let notification = Notification::new(
        user_id,
        Some(event_id),
        fanout::invite_message(event.event_type, &event.title),
        NotificationType::EventInvite,
    );
    db::notifications::create(&notification, pool).await?;
    Ok(invitation.id)
}
