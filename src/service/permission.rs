use bitflags::bitflags;
use uuid::Uuid;

use crate::{errors::ApiError, models::Role};

use super::auth::UserAuthData;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u8 {
        const MANAGE_ANY_EVENT = 1;
        const PUBLISH_NEWS = 1 << 1;
        const MANAGE_ANY_NEWS = 1 << 2;
    }
}

impl Permissions {
    /// Extra rights on top of what any signed-in user may do (creating
    /// events, managing their own events and news).
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Permissions::all(),
            Role::Manager => Permissions::PUBLISH_NEWS,
            Role::Employee => Permissions::empty(),
        }
    }
}

pub fn ensure(user: &UserAuthData, required: Permissions, message: &str) -> Result<(), ApiError> {
    if user.permissions().contains(required) {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

/// Owners pass; everyone else needs `required`.
pub fn ensure_owner_or(
    user: &UserAuthData,
    owner_id: Uuid,
    required: Permissions,
    message: &str,
) -> Result<(), ApiError> {
    if user.user_id == owner_id {
        return Ok(());
    }
    ensure(user, required, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> UserAuthData {
        UserAuthData {
            user_id: Uuid::new_v4(),
            email: "someone@corp.io".to_string(),
            role,
        }
    }

    #[test]
    fn admin_can_do_everything() {
        assert_eq!(Permissions::for_role(Role::Admin), Permissions::all());
    }

    #[test]
    fn employees_have_no_extra_rights() {
        assert!(Permissions::for_role(Role::Employee).is_empty());
        assert!(!Permissions::for_role(Role::Manager).contains(Permissions::MANAGE_ANY_EVENT));
    }

    #[test]
    fn employees_cannot_publish_news() {
        let err = ensure(&user(Role::Employee), Permissions::PUBLISH_NEWS, "no rights").unwrap_err();
        assert_eq!(err, ApiError::forbidden("no rights"));
        assert!(ensure(&user(Role::Manager), Permissions::PUBLISH_NEWS, "no rights").is_ok());
    }

    #[test]
    fn owner_passes_without_permission() {
        let owner = user(Role::Employee);
        assert!(ensure_owner_or(&owner, owner.user_id, Permissions::MANAGE_ANY_EVENT, "no rights").is_ok());
    }

    #[test]
    fn stranger_needs_permission() {
        let owner_id = Uuid::new_v4();
        assert!(ensure_owner_or(&user(Role::Manager), owner_id, Permissions::MANAGE_ANY_EVENT, "no rights").is_err());
        assert!(ensure_owner_or(&user(Role::Admin), owner_id, Permissions::MANAGE_ANY_EVENT, "no rights").is_ok());
    }
}
