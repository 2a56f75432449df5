//! Authenticated caller context.
//!
//! Session issuance happens upstream; this type only carries which profiles
//! the current user holds.

use crate::model::profile::{ProfileId, UserId};
use crate::service::error::ServiceError;
use std::collections::HashSet;

/// Already-authenticated caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
    profiles: HashSet<ProfileId>,
}

impl Caller {
    pub fn new(user_id: UserId, profiles: impl IntoIterator<Item = ProfileId>) -> Self {
        Self {
            user_id,
            profiles: profiles.into_iter().collect(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns whether the caller holds `profile_id`.
    pub fn owns(&self, profile_id: ProfileId) -> bool {
        self.profiles.contains(&profile_id)
    }

    /// Fails with `Forbidden` unless the caller holds `profile_id`.
    pub fn authorize(&self, profile_id: ProfileId) -> Result<ProfileId, ServiceError> {
        if self.owns(profile_id) {
            Ok(profile_id)
        } else {
            Err(ServiceError::Forbidden(profile_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Caller;
    use crate::service::error::ServiceError;
    use uuid::Uuid;

    #[test]
    fn authorize_accepts_held_profiles_only() {
        let held = Uuid::new_v4();
        let other = Uuid::new_v4();
        let caller = Caller::new(Uuid::new_v4(), [held]);

        assert_eq!(caller.authorize(held).unwrap(), held);
        assert!(matches!(
            caller.authorize(other),
            Err(ServiceError::Forbidden(id)) if id == other
        ));
    }
}
