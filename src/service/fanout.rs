//! Audience planning for a new event.
//!
//! Individual and department meetings invite a fixed set of users; every
//! other event type may instead be announced to all employees. Each user
//! appears at most once across both lists.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::EventType;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOutPlan {
    /// Users that get a pending invitation and an invite notification.
    pub invited: Vec<Uuid>,
    /// Users that only get an announcement.
    pub announced: Vec<Uuid>,
}

/// `targeted` is the explicit participant list for individual meetings or
/// the department members for department meetings; it is ignored for the
/// other types. `employees` is only consulted when `notify_all` is set on a
/// non-targeted event.
pub fn plan(event_type: EventType, targeted: &[Uuid], notify_all: bool, employees: &[Uuid]) -> FanOutPlan {
    let mut notified: HashSet<Uuid> = HashSet::new();

    let invited = if event_type.is_targeted() {
        targeted.iter().copied().filter(|id| notified.insert(*id)).collect()
    } else {
        Vec::new()
    };

    let announced = if notify_all && !event_type.is_targeted() {
        employees.iter().copied().filter(|id| notified.insert(*id)).collect()
    } else {
        Vec::new()
    };

    FanOutPlan { invited, announced }
}

pub fn invite_message(event_type: EventType, title: &str) -> String {
    match event_type {
        EventType::MeetingDepartment => format!("You are invited to a department meeting: \"{title}\""),
        _ => format!("You have been invited to the event: \"{title}\""),
    }
}

pub fn announce_message(title: &str) -> String {
    format!("New corporate event: \"{title}\"")
}

pub fn update_message(title: &str) -> String {
    format!("The event \"{title}\" has been updated")
}

pub fn cancel_message(title: &str) -> String {
    format!("The event \"{title}\" has been cancelled.")
}
